use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalance {
    pub id: String,
    pub employee_master_id: String,
    pub leave_policy_id: String,
    #[schema(example = 2025)]
    pub year: i32,
    pub total_allocated: i64,
    pub used: i64,
    pub carry_forward: i64,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(LeaveBalance, "leave_balances", "Leave balance");

impl LeaveBalance {
    pub fn available(&self) -> i64 {
        self.total_allocated + self.carry_forward - self.used
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLeaveBalance {
    #[validate(length(min = 1, message = "employee_master_id is required"))]
    pub employee_master_id: String,
    #[validate(length(min = 1, message = "leave_policy_id is required"))]
    pub leave_policy_id: String,
    #[validate(range(min = 2000, message = "year must be 2000 or later"))]
    pub year: i32,
    #[validate(range(min = 0))]
    pub total_allocated: i64,
    #[validate(range(min = 0))]
    pub used: Option<i64>,
    #[validate(range(min = 0))]
    pub carry_forward: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLeaveBalance {
    #[validate(range(min = 0))]
    pub total_allocated: Option<i64>,
    #[validate(range(min = 0))]
    pub used: Option<i64>,
    #[validate(range(min = 0))]
    pub carry_forward: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LeaveBalanceQuery {
    pub employee_master_id: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveBalanceResponse {
    #[serde(flatten)]
    pub balance: LeaveBalance,
    pub available: i64,
}

impl From<LeaveBalance> for LeaveBalanceResponse {
    fn from(balance: LeaveBalance) -> Self {
        let available = balance.available();
        Self { balance, available }
    }
}
