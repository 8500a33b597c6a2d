use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CameraDevice {
    pub id: String,
    #[schema(example = "Lobby Camera")]
    pub device_name: String,
    #[schema(example = "CAM-01")]
    pub device_code: String,
    #[schema(example = "Main Entrance")]
    pub location: String,
    pub ip_address: Option<String>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(CameraDevice, "camera_devices", "Camera device", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateCameraDevice {
    #[validate(length(min = 1, message = "device_name is required"))]
    pub device_name: String,
    #[validate(length(min = 1, max = 64, message = "device_code must be 1-64 characters"))]
    pub device_code: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    pub ip_address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateCameraDevice {
    #[validate(length(min = 1))]
    pub device_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub device_code: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub is_active: Option<bool>,
}
