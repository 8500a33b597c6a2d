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
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
    Resigned,
    Terminated,
}

/// Canonical employee profile (the master record).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeMaster {
    pub id: String,
    #[schema(example = "EMP-0001")]
    pub employee_code: String,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "+8801712345678")]
    pub phone: String,
    pub alternate_phone: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub blood_group: Option<String>,
    pub department_id: Option<String>,
    pub designation_id: Option<String>,
    pub employee_type: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub joining_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub confirmation_date: Option<NaiveDate>,
    pub reporting_manager_id: Option<String>,
    pub work_location_id: Option<String>,
    pub shift_id: Option<String>,
    pub salary_template_id: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub uan_number: Option<String>,
    pub esic_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub status: EmployeeStatus,
    pub profile_photo: Option<String>,
    pub user_id: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(EmployeeMaster, "employees", "Employee");

impl EmployeeMaster {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateEmployee {
    /// Generated (`EMP-0001`, ...) when omitted.
    #[validate(length(min = 1, max = 64))]
    pub employee_code: Option<String>,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub alternate_phone: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub blood_group: Option<String>,
    pub department_id: Option<String>,
    pub designation_id: Option<String>,
    pub employee_type: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub joining_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub confirmation_date: Option<NaiveDate>,
    pub reporting_manager_id: Option<String>,
    pub work_location_id: Option<String>,
    pub shift_id: Option<String>,
    pub salary_template_id: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub uan_number: Option<String>,
    pub esic_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub profile_photo: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 64))]
    pub employee_code: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub blood_group: Option<String>,
    pub department_id: Option<String>,
    pub designation_id: Option<String>,
    pub employee_type: Option<String>,
    #[schema(format = "date", value_type = Option<String>)]
    pub joining_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub confirmation_date: Option<NaiveDate>,
    pub reporting_manager_id: Option<String>,
    pub work_location_id: Option<String>,
    pub shift_id: Option<String>,
    pub salary_template_id: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub uan_number: Option<String>,
    pub esic_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub profile_photo: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Filter by department id
    pub department_id: Option<String>,
    /// Filter by designation id
    pub designation_id: Option<String>,
    /// Filter by status (case-insensitive)
    #[schema(example = "ACTIVE")]
    pub status: Option<String>,
    /// Search by name, code or email
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[serde(flatten)]
    pub employee: EmployeeMaster,
    pub full_name: String,
    pub department_name: Option<String>,
    pub designation_name: Option<String>,
}
