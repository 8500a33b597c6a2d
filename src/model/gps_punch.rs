use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PunchType {
    In,
    Out,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PunchStatus {
    #[default]
    Valid,
    Invalid,
    OutsideGeofence,
}

/// A check-in/out captured with device coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GpsPunch {
    pub id: String,
    pub employee_master_id: String,
    pub project_id: Option<String>,
    pub punch_type: PunchType,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub punch_time: DateTime<Utc>,
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
    pub location: Option<String>,
    /// Metres from the expected site.
    pub distance: Option<f64>,
    pub status: PunchStatus,
    pub accuracy: Option<f64>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(GpsPunch, "gps_punches", "GPS punch");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateGpsPunch {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    pub project_id: Option<String>,
    pub punch_type: PunchType,
    /// Defaults to the time the punch is received.
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub punch_time: Option<DateTime<Utc>>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    pub status: Option<PunchStatus>,
    #[validate(range(min = 0.0))]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GpsPunchQuery {
    pub employee_master_id: Option<String>,
    /// `IN`, `OUT` or `all`
    pub punch_type: Option<String>,
    /// Punch status or `all`
    pub status: Option<String>,
    /// Project id or `all`
    pub project_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Inclusive through the end of the day
    pub end_date: Option<NaiveDate>,
    /// Search employee name or code
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GpsPunchResponse {
    pub id: String,
    pub employee_id: String,
    pub employee_code: String,
    pub employee_name: String,
    pub department: String,
    pub designation: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_code: Option<String>,
    pub punch_type: PunchType,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub punch_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub location: Option<String>,
    pub distance: Option<f64>,
    pub status: PunchStatus,
    pub accuracy: Option<f64>,
}
