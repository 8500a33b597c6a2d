use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::department::Department;
use crate::model::designation::Designation;
use crate::model::employee::{
    CreateEmployee, EmployeeMaster, EmployeeQuery, EmployeeResponse, EmployeeStatus, UpdateEmployee,
};
use crate::model::enum_value;
use crate::model::location::Location;
use crate::model::salary_template::SalaryTemplate;
use crate::model::shift::Shift;
use crate::store::{Condition, Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, ensure_optional, now, parse_filter};

const CODE_SEQUENCE: &str = "employee";
/// Attempts at skipping generated codes that were already taken by hand.
const CODE_ATTEMPTS: usize = 50;

pub fn employee_code(seq: u64) -> String {
    format!("EMP-{:04}", seq)
}

/// References an employee may carry; each must exist when given.
struct References<'a> {
    department_id: Option<&'a str>,
    designation_id: Option<&'a str>,
    shift_id: Option<&'a str>,
    salary_template_id: Option<&'a str>,
    work_location_id: Option<&'a str>,
    reporting_manager_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct EmployeeService {
    store: Store,
}

impl EmployeeService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn check_references(&self, refs: References<'_>) -> ApiResult<()> {
        ensure_optional::<Department>(&self.store, refs.department_id).await?;
        ensure_optional::<Designation>(&self.store, refs.designation_id).await?;
        ensure_optional::<Shift>(&self.store, refs.shift_id).await?;
        ensure_optional::<SalaryTemplate>(&self.store, refs.salary_template_id).await?;
        ensure_optional::<Location>(&self.store, refs.work_location_id).await?;
        match ensure_optional::<EmployeeMaster>(&self.store, refs.reporting_manager_id).await {
            Err(ApiError::NotFound(_)) => Err(ApiError::NotFound("Reporting manager not found".into())),
            other => other.map(|_| ()),
        }
    }

    async fn generate_code(&self) -> ApiResult<String> {
        for _ in 0..CODE_ATTEMPTS {
            let code = employee_code(self.store.next_sequence(CODE_SEQUENCE).await?);
            let taken = self
                .store
                .find_first::<EmployeeMaster>(Filter::new().eq("employee_code", code.as_str()))
                .await?
                .is_some();
            if !taken {
                return Ok(code);
            }
        }
        Err(ApiError::Conflict("Could not allocate an employee code".into()))
    }

    pub async fn create(&self, dto: CreateEmployee) -> ApiResult<EmployeeResponse> {
        if let Some(code) = dto.employee_code.as_deref() {
            ensure_code_available::<EmployeeMaster>(&self.store, "employee_code", code, None).await?;
        }
        self.check_references(References {
            department_id: dto.department_id.as_deref(),
            designation_id: dto.designation_id.as_deref(),
            shift_id: dto.shift_id.as_deref(),
            salary_template_id: dto.salary_template_id.as_deref(),
            work_location_id: dto.work_location_id.as_deref(),
            reporting_manager_id: dto.reporting_manager_id.as_deref(),
        })
        .await?;

        let employee_code = match dto.employee_code {
            Some(code) => code,
            None => self.generate_code().await?,
        };

        let now = now();
        let employee = EmployeeMaster {
            id: new_id(),
            employee_code,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone: dto.phone,
            alternate_phone: dto.alternate_phone,
            date_of_birth: dto.date_of_birth,
            gender: dto.gender,
            marital_status: dto.marital_status,
            blood_group: dto.blood_group,
            department_id: dto.department_id.filter(|v| !v.is_empty()),
            designation_id: dto.designation_id.filter(|v| !v.is_empty()),
            employee_type: dto.employee_type,
            joining_date: dto.joining_date,
            confirmation_date: dto.confirmation_date,
            reporting_manager_id: dto.reporting_manager_id.filter(|v| !v.is_empty()),
            work_location_id: dto.work_location_id.filter(|v| !v.is_empty()),
            shift_id: dto.shift_id.filter(|v| !v.is_empty()),
            salary_template_id: dto.salary_template_id.filter(|v| !v.is_empty()),
            pan_number: dto.pan_number,
            aadhar_number: dto.aadhar_number,
            uan_number: dto.uan_number,
            esic_number: dto.esic_number,
            address: dto.address,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            country: dto.country,
            emergency_contact_name: dto.emergency_contact_name,
            emergency_contact_relation: dto.emergency_contact_relation,
            emergency_contact_phone: dto.emergency_contact_phone,
            status: dto.status.unwrap_or_default(),
            profile_photo: dto.profile_photo,
            user_id: dto.user_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&employee).await?;

        info!(id = %employee.id, code = %employee.employee_code, "Employee created");
        self.respond_one(employee).await
    }

    pub async fn list(&self, query: EmployeeQuery) -> ApiResult<Vec<EmployeeResponse>> {
        let mut filter = Filter::new()
            .eq_opt("department_id", query.department_id.filter(|v| !v.is_empty()))
            .eq_opt("designation_id", query.designation_id.filter(|v| !v.is_empty()));

        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: EmployeeStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            filter = filter.any(
                ["first_name", "last_name", "employee_code", "email"]
                    .into_iter()
                    .map(|field| Condition::Contains(field, term.to_string()))
                    .collect(),
            );
        }

        let employees = self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?;
        self.respond(employees).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<EmployeeResponse> {
        let employee: EmployeeMaster = ensure_exists(&self.store, id).await?;
        self.respond_one(employee).await
    }

    pub async fn update(&self, id: &str, dto: UpdateEmployee) -> ApiResult<EmployeeResponse> {
        let current: EmployeeMaster = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.employee_code.as_deref().filter(|c| *c != current.employee_code) {
            ensure_code_available::<EmployeeMaster>(&self.store, "employee_code", code, Some(id)).await?;
        }
        if dto.reporting_manager_id.as_deref() == Some(id) {
            return Err(ApiError::BadRequest("An employee cannot report to themselves".into()));
        }
        self.check_references(References {
            department_id: dto.department_id.as_deref(),
            designation_id: dto.designation_id.as_deref(),
            shift_id: dto.shift_id.as_deref(),
            salary_template_id: dto.salary_template_id.as_deref(),
            work_location_id: dto.work_location_id.as_deref(),
            reporting_manager_id: dto.reporting_manager_id.as_deref(),
        })
        .await?;

        let mut updated = apply_patch(&current, &dto)?;
        // an empty id clears the link
        for link in [
            &mut updated.department_id,
            &mut updated.designation_id,
            &mut updated.shift_id,
            &mut updated.salary_template_id,
            &mut updated.work_location_id,
            &mut updated.reporting_manager_id,
        ] {
            if link.as_deref() == Some("") {
                *link = None;
            }
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<EmployeeMaster>(&self.store, id).await
    }

    async fn respond_one(&self, employee: EmployeeMaster) -> ApiResult<EmployeeResponse> {
        self.respond(vec![employee]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, employees: Vec<EmployeeMaster>) -> ApiResult<Vec<EmployeeResponse>> {
        let departments: HashMap<String, Department> = self
            .store
            .find_by_ids(employees.iter().filter_map(|e| e.department_id.clone()))
            .await?;
        let designations: HashMap<String, Designation> = self
            .store
            .find_by_ids(employees.iter().filter_map(|e| e.designation_id.clone()))
            .await?;

        Ok(employees
            .into_iter()
            .map(|employee| EmployeeResponse {
                full_name: employee.full_name(),
                department_name: employee
                    .department_id
                    .as_ref()
                    .and_then(|id| departments.get(id))
                    .map(|d| d.department_name.clone()),
                designation_name: employee
                    .designation_id
                    .as_ref()
                    .and_then(|id| designations.get(id))
                    .map(|d| d.designation_name.clone()),
                employee,
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::department::CreateDepartment;
    use crate::service::department::DepartmentService;

    pub(crate) fn new_employee(first: &str, last: &str, code: Option<&str>) -> CreateEmployee {
        CreateEmployee {
            employee_code: code.map(Into::into),
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            phone: "+8801700000000".into(),
            alternate_phone: None,
            date_of_birth: None,
            gender: None,
            marital_status: None,
            blood_group: None,
            department_id: None,
            designation_id: None,
            employee_type: None,
            joining_date: None,
            confirmation_date: None,
            reporting_manager_id: None,
            work_location_id: None,
            shift_id: None,
            salary_template_id: None,
            pan_number: None,
            aadhar_number: None,
            uan_number: None,
            esic_number: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            emergency_contact_name: None,
            emergency_contact_relation: None,
            emergency_contact_phone: None,
            status: None,
            profile_photo: None,
            user_id: None,
        }
    }

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(employee_code(7), "EMP-0007");
        assert_eq!(employee_code(12345), "EMP-12345");
    }

    #[actix_web::test]
    async fn code_is_generated_when_absent_and_skips_taken_ones() {
        let service = EmployeeService::new(Store::in_memory());
        service.create(new_employee("Ann", "Lee", Some("EMP-0002"))).await.unwrap();

        let first = service.create(new_employee("Bo", "Ray", None)).await.unwrap();
        let second = service.create(new_employee("Cy", "Fox", None)).await.unwrap();
        assert_eq!(first.employee.employee_code, "EMP-0001");
        assert_eq!(second.employee.employee_code, "EMP-0003");
    }

    #[actix_web::test]
    async fn duplicate_code_conflicts() {
        let service = EmployeeService::new(Store::in_memory());
        service.create(new_employee("Ann", "Lee", Some("E1"))).await.unwrap();
        let err = service.create(new_employee("Bo", "Ray", Some("E1"))).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[actix_web::test]
    async fn missing_department_is_not_found() {
        let service = EmployeeService::new(Store::in_memory());
        let mut dto = new_employee("Ann", "Lee", None);
        dto.department_id = Some("ghost".into());
        assert!(matches!(service.create(dto).await, Err(ApiError::NotFound(_))));
    }

    async fn finance(store: &Store) -> String {
        DepartmentService::new(store.clone())
            .create(CreateDepartment {
                department_name: "Finance".into(),
                department_code: "FIN".into(),
                description: None,
                location_id: None,
                employee_count: None,
                is_active: None,
            })
            .await
            .unwrap()
            .department
            .id
    }

    #[actix_web::test]
    async fn empty_link_in_patch_clears_it() {
        let store = Store::in_memory();
        let department_id = finance(&store).await;
        let service = EmployeeService::new(store);

        let mut ann = new_employee("Ann", "Lee", None);
        ann.department_id = Some(department_id);
        let created = service.create(ann).await.unwrap();

        let updated = service
            .update(
                &created.employee.id,
                UpdateEmployee { department_id: Some(String::new()), shift_id: Some(String::new()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.employee.department_id, None);
        assert_eq!(updated.employee.shift_id, None);
        assert_eq!(updated.department_name, None);
    }

    #[actix_web::test]
    async fn list_search_and_department_name() {
        let store = Store::in_memory();
        let department_id = finance(&store).await;
        let service = EmployeeService::new(store);

        let mut ann = new_employee("Ann", "Lee", None);
        ann.department_id = Some(department_id);
        service.create(ann).await.unwrap();
        service.create(new_employee("Bob", "Stone", None)).await.unwrap();

        let found = service
            .list(EmployeeQuery { search: Some("LEE".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Ann Lee");
        assert_eq!(found[0].department_name.as_deref(), Some("Finance"));

        let active = service
            .list(EmployeeQuery { status: Some("active".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
    }
}
