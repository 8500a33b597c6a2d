use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EnrollmentStatus {
    #[default]
    Pending,
    Enrolled,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaceEnrollment {
    pub id: String,
    pub employee_master_id: String,
    pub status: EnrollmentStatus,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub image_size: Option<u64>,
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub enrolled_at: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(FaceEnrollment, "face_enrollments", "Face enrollment");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateFaceEnrollment {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    pub status: Option<EnrollmentStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateFaceEnrollment {
    pub status: Option<EnrollmentStatus>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FaceEnrollmentQuery {
    pub employee_master_id: Option<String>,
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
    /// Search employee name or code
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Original file name; its extension picks the stored format
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FaceEnrollmentResponse {
    #[serde(flatten)]
    pub enrollment: FaceEnrollment,
    pub employee_name: Option<String>,
    pub employee_code: Option<String>,
}
