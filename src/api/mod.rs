//! HTTP handlers. Each module validates the payload, calls its service and
//! shapes the status code; routing lives in `routes.rs`.

pub mod attendance_regularization;
pub mod camera_device;
pub mod daily_attendance;
pub mod department;
pub mod designation;
pub mod employee;
pub mod employee_assignment;
pub mod face_enrollment;
pub mod face_recognition_log;
pub mod gps_punch;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_policy;
pub mod location;
pub mod project;
pub mod project_category;
pub mod project_document;
pub mod salary_template;
pub mod shift;

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Location deleted successfully")]
    pub message: String,
}

pub(crate) fn deleted(label: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse { message: format!("{} deleted successfully", label) })
}
