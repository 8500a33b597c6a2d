//! Employee details embedded in punch and recognition listings.

use std::collections::HashMap;

use crate::error::ApiResult;
use crate::model::department::Department;
use crate::model::designation::Designation;
use crate::model::employee::EmployeeMaster;
use crate::store::Store;

pub const NOT_ASSIGNED: &str = "Not assigned";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeCard {
    pub code: String,
    pub name: String,
    pub department: String,
    pub designation: String,
}

impl EmployeeCard {
    /// Shown when the employee is missing or was never linked.
    pub fn unknown() -> Self {
        Self {
            code: String::new(),
            name: UNKNOWN.to_string(),
            department: NOT_ASSIGNED.to_string(),
            designation: NOT_ASSIGNED.to_string(),
        }
    }
}

/// Three batched lookups, however many ids are given.
pub async fn load_cards<I>(store: &Store, employee_ids: I) -> ApiResult<HashMap<String, EmployeeCard>>
where
    I: IntoIterator<Item = String>,
{
    let employees: HashMap<String, EmployeeMaster> = store.find_by_ids(employee_ids).await?;
    let departments: HashMap<String, Department> = store
        .find_by_ids(employees.values().filter_map(|e| e.department_id.clone()))
        .await?;
    let designations: HashMap<String, Designation> = store
        .find_by_ids(employees.values().filter_map(|e| e.designation_id.clone()))
        .await?;

    Ok(employees
        .into_iter()
        .map(|(id, e)| {
            let department = e
                .department_id
                .as_ref()
                .and_then(|d| departments.get(d))
                .map_or_else(|| NOT_ASSIGNED.to_string(), |d| d.department_name.clone());
            let designation = e
                .designation_id
                .as_ref()
                .and_then(|d| designations.get(d))
                .map_or_else(|| NOT_ASSIGNED.to_string(), |d| d.designation_name.clone());
            let card = EmployeeCard {
                name: e.full_name(),
                code: e.employee_code,
                department,
                designation,
            };
            (id, card)
        })
        .collect())
}
