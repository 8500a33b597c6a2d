use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::department::DepartmentSummary;
use super::designation::DesignationSummary;
use super::location::LocationSummary;
use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shift {
    pub id: String,
    #[schema(example = "Night Shift")]
    pub shift_name: String,
    #[schema(example = "NS-01")]
    pub shift_code: String,
    #[schema(example = "22:00")]
    pub start_time: String,
    #[schema(example = "06:00")]
    pub end_time: String,
    /// Minutes.
    #[schema(example = 30)]
    pub break_duration: u32,
    #[schema(example = 7.5)]
    pub total_hours: f64,
    pub is_flexible: bool,
    #[serde(default)]
    pub employee_count: u32,
    pub is_active: bool,
    #[schema(example = json!(["Monday", "Tuesday"]))]
    pub working_days: Vec<String>,
    pub location_id: Option<String>,
    #[serde(default)]
    pub department_ids: Vec<String>,
    #[serde(default)]
    pub designation_ids: Vec<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(Shift, "shifts", "Shift", active);

/// Accepts 24-hour `HH:mm`.
pub fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 5
        && value.as_bytes()[2] == b':'
        && chrono::NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("time_format").with_message("expected HH:mm".into()))
    }
}

fn validate_working_days(days: &[String]) -> Result<(), ValidationError> {
    match days.iter().find(|d| d.parse::<Weekday>().is_err()) {
        Some(_) => Err(ValidationError::new("working_days").with_message("unknown day name".into())),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateShift {
    #[validate(length(min = 1, message = "shift_name is required"))]
    pub shift_name: String,
    #[validate(length(min = 1, max = 64, message = "shift_code must be 1-64 characters"))]
    pub shift_code: String,
    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "09:00")]
    pub start_time: String,
    #[validate(custom(function = "validate_hhmm"))]
    #[schema(example = "18:00")]
    pub end_time: String,
    #[validate(range(min = 0, max = 480))]
    pub break_duration: Option<u32>,
    #[validate(range(min = 0.0))]
    pub total_hours: Option<f64>,
    pub is_flexible: Option<bool>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
    #[validate(custom(function = "validate_working_days"))]
    pub working_days: Vec<String>,
    pub location_id: Option<String>,
    pub department_ids: Option<Vec<String>>,
    pub designation_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateShift {
    #[validate(length(min = 1))]
    pub shift_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub shift_code: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: Option<String>,
    #[validate(range(min = 0, max = 480))]
    pub break_duration: Option<u32>,
    #[validate(range(min = 0.0))]
    pub total_hours: Option<f64>,
    pub is_flexible: Option<bool>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
    #[validate(custom(function = "validate_working_days"))]
    pub working_days: Option<Vec<String>>,
    /// An empty string clears the location.
    pub location_id: Option<String>,
    pub department_ids: Option<Vec<String>>,
    pub designation_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftResponse {
    #[serde(flatten)]
    pub shift: Shift,
    pub location: Option<LocationSummary>,
    pub departments: Vec<DepartmentSummary>,
    pub designations: Vec<DesignationSummary>,
}
