use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

/// Parsing is case-insensitive, so the display labels (`Recognized`, ...)
/// are accepted as well as the stored values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RecognitionStatus {
    Recognized,
    Failed,
    #[default]
    Unknown,
}

impl RecognitionStatus {
    pub fn label(self) -> &'static str {
        match self {
            RecognitionStatus::Recognized => "Recognized",
            RecognitionStatus::Failed => "Failed",
            RecognitionStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaceRecognitionLog {
    pub id: String,
    pub employee_master_id: Option<String>,
    pub camera_device_id: String,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub recognition_time: DateTime<Utc>,
    pub status: RecognitionStatus,
    #[schema(example = 0.97)]
    pub confidence: Option<f64>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub remarks: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(FaceRecognitionLog, "face_recognition_logs", "Face recognition log");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateFaceLog {
    pub employee_master_id: Option<String>,
    #[validate(length(min = 1, message = "camera_device_id is required"))]
    pub camera_device_id: String,
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub recognition_time: Option<DateTime<Utc>>,
    pub status: Option<RecognitionStatus>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateFaceLog {
    pub employee_master_id: Option<String>,
    #[validate(length(min = 1))]
    pub camera_device_id: Option<String>,
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub recognition_time: Option<DateTime<Utc>>,
    pub status: Option<RecognitionStatus>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
    pub image_url: Option<String>,
    pub location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FaceLogQuery {
    pub camera_device_id: Option<String>,
    pub employee_master_id: Option<String>,
    /// Stored value or display label, e.g. `RECOGNIZED` or `Recognized`
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Maximum number of logs (default 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecentQuery {
    /// Maximum number of logs (default 50)
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FaceLogResponse {
    pub id: String,
    pub employee_id: String,
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    pub designation: String,
    pub camera_location: String,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub recognition_time: DateTime<Utc>,
    #[schema(example = "Recognized")]
    pub status: &'static str,
    pub confidence: Option<f64>,
    pub image_url: Option<String>,
    pub camera_device_id: String,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct FaceLogStatistics {
    pub total: u64,
    pub recognized: u64,
    pub failed: u64,
    pub unknown: u64,
}
