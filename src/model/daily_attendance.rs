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
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    Late,
    HalfDay,
    OnLeave,
    Holiday,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyAttendance {
    pub id: String,
    pub employee_master_id: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:05")]
    pub check_in: Option<String>,
    #[schema(example = "18:10")]
    pub check_out: Option<String>,
    pub working_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub location: Option<String>,
    pub remarks: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(DailyAttendance, "daily_attendance", "Daily attendance");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDailyAttendance {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    #[validate(custom(function = "validate_hhmm"))]
    pub check_in: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub check_out: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub working_hours: Option<f64>,
    pub status: Option<AttendanceStatus>,
    pub location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateDailyAttendance {
    #[schema(format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "validate_hhmm"))]
    pub check_in: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub check_out: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub working_hours: Option<f64>,
    pub status: Option<AttendanceStatus>,
    pub location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DailyAttendanceQuery {
    /// Employee master id
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
    /// Department of the employee
    pub department_id: Option<String>,
    /// Search employee name/code, location or remarks
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyAttendanceResponse {
    pub id: String,
    pub employee_master_id: String,
    pub employee_name: Option<String>,
    pub employee_code: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub working_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub location: Option<String>,
    pub remarks: Option<String>,
}
