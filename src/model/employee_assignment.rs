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
pub enum AssignmentStatus {
    #[default]
    Active,
    Completed,
    OnHold,
    Cancelled,
}

impl AssignmentStatus {
    /// Display label used in responses.
    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Active => "Active",
            AssignmentStatus::Completed => "Completed",
            AssignmentStatus::OnHold => "On Hold",
            AssignmentStatus::Cancelled => "Cancelled",
        }
    }
}

/// A staff profile allocated to a project.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeAssignment {
    pub id: String,
    /// Staff profile id.
    pub employee_id: String,
    pub project_id: String,
    #[schema(example = "Site Engineer")]
    pub role: String,
    #[schema(example = 100.0)]
    pub allocation_percentage: f64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub hourly_rate: Option<f64>,
    pub status: AssignmentStatus,
    #[schema(format = "date", value_type = String)]
    pub assigned_date: NaiveDate,
    pub assigned_by: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(EmployeeAssignment, "employee_assignments", "Employee assignment");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateAssignment {
    /// Staff profile id or employee master id.
    #[validate(length(min = 1, message = "employee_id is required"))]
    pub employee_id: String,
    #[validate(length(min = 1, message = "project_id is required"))]
    pub project_id: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub allocation_percentage: f64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
    pub status: Option<AssignmentStatus>,
    pub assigned_by: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateAssignment {
    #[validate(length(min = 1))]
    pub role: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub allocation_percentage: Option<f64>,
    #[schema(format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
    pub status: Option<AssignmentStatus>,
    pub assigned_by: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AssignmentQuery {
    pub employee_id: Option<String>,
    pub project_id: Option<String>,
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_code: String,
    /// Designation name, falling back to the stored id.
    pub designation: String,
    /// Department name, falling back to the stored id.
    pub department: String,
    pub project_id: String,
    pub project_name: String,
    pub project_code: String,
    pub role: String,
    pub allocation_percentage: f64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub hourly_rate: Option<f64>,
    #[schema(example = "Active")]
    pub status: &'static str,
    #[schema(format = "date", value_type = String)]
    pub assigned_date: NaiveDate,
    pub assigned_by: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}
