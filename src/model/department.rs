use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::location::LocationSummary;
use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: String,
    #[schema(example = "Human Resources")]
    pub department_name: String,
    #[schema(example = "HR")]
    pub department_code: String,
    pub description: Option<String>,
    pub location_id: Option<String>,
    #[serde(default)]
    pub employee_count: u32,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(Department, "departments", "Department", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDepartment {
    #[validate(length(min = 1, message = "department_name is required"))]
    #[schema(example = "Human Resources")]
    pub department_name: String,
    #[validate(length(min = 1, max = 64, message = "department_code must be 1-64 characters"))]
    #[schema(example = "HR")]
    pub department_code: String,
    pub description: Option<String>,
    pub location_id: Option<String>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateDepartment {
    #[validate(length(min = 1))]
    pub department_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub department_code: Option<String>,
    pub description: Option<String>,
    pub location_id: Option<String>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    #[serde(flatten)]
    pub department: Department,
    pub location: Option<LocationSummary>,
}

/// Compact department shape embedded in shift responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DepartmentSummary {
    pub id: String,
    pub department_name: String,
    pub department_code: String,
    pub location_id: Option<String>,
}

impl From<&Department> for DepartmentSummary {
    fn from(d: &Department) -> Self {
        Self {
            id: d.id.clone(),
            department_name: d.department_name.clone(),
            department_code: d.department_code.clone(),
            location_id: d.location_id.clone(),
        }
    }
}
