use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::employee::{EmployeeMaster, EmployeeStatus};
use super::timestamp;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

/// Lightweight projection of an [`EmployeeMaster`] used by project
/// assignments. Matched to its master by `employee_code`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffProfile {
    pub id: String,
    #[schema(example = "EMP-0001")]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Department id copied from the master.
    pub department: Option<String>,
    /// Designation id copied from the master.
    pub designation: Option<String>,
    pub status: StaffStatus,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(StaffProfile, "staff_profiles", "Employee");

impl StaffProfile {
    pub fn project(master: &EmployeeMaster, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_code: master.employee_code.clone(),
            name: master.full_name(),
            email: master.email.clone(),
            phone: master.phone.clone(),
            department: master.department_id.clone().filter(|d| !d.is_empty()),
            designation: master.designation_id.clone().filter(|d| !d.is_empty()),
            status: match master.status {
                EmployeeStatus::Active => StaffStatus::Active,
                _ => StaffStatus::Inactive,
            },
            created_at: now,
            updated_at: now,
        }
    }
}
