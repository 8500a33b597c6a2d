use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeavePolicy {
    pub id: String,
    #[schema(example = "Annual Leave")]
    pub policy_name: String,
    #[schema(example = "AL")]
    pub policy_code: String,
    #[schema(example = "ANNUAL")]
    pub leave_type: String,
    #[schema(example = 20)]
    pub days_per_year: u32,
    pub carry_forward_allowed: bool,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(LeavePolicy, "leave_policies", "Leave policy", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLeavePolicy {
    #[validate(length(min = 1, message = "policy_name is required"))]
    pub policy_name: String,
    #[validate(length(min = 1, max = 64, message = "policy_code must be 1-64 characters"))]
    pub policy_code: String,
    #[validate(length(min = 1, message = "leave_type is required"))]
    pub leave_type: String,
    #[validate(range(max = 366))]
    pub days_per_year: u32,
    pub carry_forward_allowed: Option<bool>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLeavePolicy {
    #[validate(length(min = 1))]
    pub policy_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub policy_code: Option<String>,
    #[validate(length(min = 1))]
    pub leave_type: Option<String>,
    #[validate(range(max = 366))]
    pub days_per_year: Option<u32>,
    pub carry_forward_allowed: Option<bool>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
