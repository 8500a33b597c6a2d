pub mod patch;
pub mod upload;

pub use patch::apply_patch;
