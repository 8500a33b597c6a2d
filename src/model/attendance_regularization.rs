use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::shift::validate_hhmm;
use super::timestamp;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RegularizationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Request to correct the recorded check-in/out of one day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRegularization {
    pub id: String,
    pub employee_master_id: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub original_check_in: Option<String>,
    pub original_check_out: Option<String>,
    pub requested_check_in: String,
    pub requested_check_out: String,
    pub reason: String,
    pub supporting_document: Option<String>,
    pub status: RegularizationStatus,
    pub reviewed_by: Option<String>,
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_remarks: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(AttendanceRegularization, "attendance_regularizations", "Attendance regularization");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateRegularization {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    #[validate(custom(function = "validate_hhmm"))]
    pub original_check_in: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub original_check_out: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "09:00")]
    pub requested_check_in: String,
    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "18:00")]
    pub requested_check_out: String,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
    pub supporting_document: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateRegularization {
    #[validate(custom(function = "validate_hhmm"))]
    pub requested_check_in: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub requested_check_out: Option<String>,
    #[validate(length(min = 1))]
    pub reason: Option<String>,
    pub supporting_document: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReviewRegularization {
    pub review_remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RegularizationQuery {
    pub employee_master_id: Option<String>,
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
}
