use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Designation {
    pub id: String,
    #[schema(example = "Software Engineer")]
    pub designation_name: String,
    #[schema(example = "SE")]
    pub designation_code: String,
    /// Free-text department name or id this designation belongs to.
    pub department: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
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

record!(Designation, "designations", "Designation", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDesignation {
    #[validate(length(min = 1, message = "designation_name is required"))]
    pub designation_name: String,
    #[validate(length(min = 1, max = 64, message = "designation_code must be 1-64 characters"))]
    pub designation_code: String,
    pub department: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateDesignation {
    #[validate(length(min = 1))]
    pub designation_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub designation_code: Option<String>,
    pub department: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<u32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DesignationQuery {
    pub is_active: Option<bool>,
    /// Department name or id
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesignationSummary {
    pub id: String,
    pub designation_name: String,
    pub designation_code: String,
    pub department: Option<String>,
}

impl From<&Designation> for DesignationSummary {
    fn from(d: &Designation) -> Self {
        Self {
            id: d.id.clone(),
            designation_name: d.designation_name.clone(),
            designation_code: d.designation_code.clone(),
            department: d.department.clone(),
        }
    }
}
