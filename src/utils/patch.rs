use serde::Serialize;
use serde_json::Value;

use crate::store::{Record, StoreError};

/// ===============================
/// Merge a partial update into a record
/// ===============================
///
/// The update DTO is serialized and every non-null field overwrites the same
/// field of the serialized record. Absent (`None`) fields keep their stored
/// value.
pub fn apply_patch<R: Record, P: Serialize>(record: &R, patch: &P) -> Result<R, StoreError> {
    let mut doc = serde_json::to_value(record)?;
    let changes = serde_json::to_value(patch)?;

    let (Some(target), Some(changes)) = (doc.as_object_mut(), changes.as_object()) else {
        return Err(StoreError::Serialization("patch must be a JSON object".into()));
    };

    for (key, value) in changes {
        if value.is_null() || key == "id" {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }

    Ok(serde_json::from_value(doc)?)
}
