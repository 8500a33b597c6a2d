use chrono::{DateTime, NaiveDate, Utc};
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
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// APPROVED and REJECTED are reviewer decisions.
    pub fn is_decision(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveApplication {
    pub id: String,
    #[schema(example = "LA-2025-0001")]
    pub application_number: String,
    pub employee_master_id: String,
    pub leave_policy_id: String,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub applied_date: DateTime<Utc>,
    pub approved_by: Option<String>,
    #[serde(default, with = "timestamp::option")]
    #[schema(format = "date-time", value_type = Option<String>)]
    pub approved_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(LeaveApplication, "leave_applications", "Leave application");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLeaveApplication {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    #[validate(length(min = 1, message = "leave_policy_id is required"))]
    pub leave_policy_id: String,
    #[schema(format = "date", value_type = String, example = "2025-03-10")]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String, example = "2025-03-12")]
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLeaveApplication {
    #[validate(length(min = 1))]
    pub employee_master_id: Option<String>,
    #[validate(length(min = 1))]
    pub leave_policy_id: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub status: Option<LeaveStatus>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ApproveLeave {
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "Project deadline")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LeaveApplicationQuery {
    pub employee_master_id: Option<String>,
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
    /// Applied on or after this date (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Applied on or before this date (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    /// Search application number, reason, employee name or code
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveApplicationResponse {
    pub id: String,
    pub application_number: String,
    pub employee_master_id: String,
    pub employee_name: Option<String>,
    pub employee_code: Option<String>,
    /// Department id of the employee.
    pub department: Option<String>,
    pub leave_policy_id: String,
    pub leave_type: Option<String>,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(format = "date", value_type = String)]
    pub applied_date: NaiveDate,
    pub approved_by: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub approved_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}
