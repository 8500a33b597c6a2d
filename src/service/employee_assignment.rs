use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::department::Department;
use crate::model::designation::Designation;
use crate::model::employee_assignment::{
    AssignmentQuery, AssignmentResponse, AssignmentStatus, CreateAssignment, EmployeeAssignment,
    UpdateAssignment,
};
use crate::model::enum_value;
use crate::model::project::Project;
use crate::model::staff_profile::StaffProfile;
use crate::store::{Filter, Query, Store, StoreError, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, now, parse_filter};
use super::staff_profile::StaffProfileService;

const DUPLICATE_ACTIVE: &str = "Employee already has an active assignment to this project";

#[derive(Clone)]
pub struct EmployeeAssignmentService {
    store: Store,
    staff: StaffProfileService,
}

impl EmployeeAssignmentService {
    pub fn new(store: Store) -> Self {
        Self { staff: StaffProfileService::new(store.clone()), store }
    }

    /// `employee_id` may name a staff profile or an employee master; the
    /// latter is projected to its staff profile first.
    async fn resolve_staff(&self, employee_id: &str) -> ApiResult<StaffProfile> {
        if let Some(profile) = self.store.find::<StaffProfile>(employee_id).await? {
            return Ok(profile);
        }
        self.staff.ensure_for_master_id(employee_id).await
    }

    async fn ensure_no_active(&self, employee_id: &str, project_id: &str, except: Option<&str>) -> ApiResult<()> {
        let existing = self
            .store
            .find_first::<EmployeeAssignment>(
                Filter::new()
                    .eq("employee_id", employee_id)
                    .eq("project_id", project_id)
                    .eq("status", enum_value(&AssignmentStatus::Active)),
            )
            .await?;
        match existing {
            Some(a) if Some(a.id.as_str()) != except => Err(ApiError::Conflict(DUPLICATE_ACTIVE.into())),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, dto: CreateAssignment) -> ApiResult<AssignmentResponse> {
        let project: Project = ensure_exists(&self.store, &dto.project_id).await?;
        let staff = self.resolve_staff(&dto.employee_id).await?;

        let status = dto.status.unwrap_or_default();
        if status == AssignmentStatus::Active {
            self.ensure_no_active(&staff.id, &project.id, None).await?;
        }
        if let Some(end) = dto.end_date {
            if end < dto.start_date {
                return Err(ApiError::BadRequest("End date cannot be before start date".into()));
            }
        }

        let now = now();
        let assignment = EmployeeAssignment {
            id: new_id(),
            employee_id: staff.id.clone(),
            project_id: project.id.clone(),
            role: dto.role,
            allocation_percentage: dto.allocation_percentage,
            start_date: dto.start_date,
            end_date: dto.end_date,
            hourly_rate: dto.hourly_rate,
            status,
            assigned_date: now.date_naive(),
            assigned_by: dto.assigned_by,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&assignment).await.map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict(DUPLICATE_ACTIVE.into()),
            other => other.into(),
        })?;

        info!(
            id = %assignment.id,
            employee_id = %assignment.employee_id,
            project_id = %assignment.project_id,
            "Employee assigned to project"
        );
        self.respond_one(assignment).await
    }

    pub async fn list(&self, query: AssignmentQuery) -> ApiResult<Vec<AssignmentResponse>> {
        let mut filter = Filter::new()
            .eq_opt("employee_id", query.employee_id.filter(|v| !v.is_empty()))
            .eq_opt("project_id", query.project_id.filter(|v| !v.is_empty()));
        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: AssignmentStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }

        let assignments = self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?;
        self.respond(assignments).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<AssignmentResponse> {
        let assignment: EmployeeAssignment = ensure_exists(&self.store, id).await?;
        self.respond_one(assignment).await
    }

    pub async fn update(&self, id: &str, dto: UpdateAssignment) -> ApiResult<AssignmentResponse> {
        let current: EmployeeAssignment = ensure_exists(&self.store, id).await?;

        let mut updated = apply_patch(&current, &dto)?;
        if updated.status == AssignmentStatus::Active && current.status != AssignmentStatus::Active {
            self.ensure_no_active(&updated.employee_id, &updated.project_id, Some(id)).await?;
        }
        if let Some(end) = updated.end_date {
            if end < updated.start_date {
                return Err(ApiError::BadRequest("End date cannot be before start date".into()));
            }
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<EmployeeAssignment>(&self.store, id).await
    }

    async fn respond_one(&self, assignment: EmployeeAssignment) -> ApiResult<AssignmentResponse> {
        self.respond(vec![assignment]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, assignments: Vec<EmployeeAssignment>) -> ApiResult<Vec<AssignmentResponse>> {
        let staff: HashMap<String, StaffProfile> = self
            .store
            .find_by_ids(assignments.iter().map(|a| a.employee_id.clone()))
            .await?;
        let projects: HashMap<String, Project> = self
            .store
            .find_by_ids(assignments.iter().map(|a| a.project_id.clone()))
            .await?;
        let departments: HashMap<String, Department> = self
            .store
            .find_by_ids(staff.values().filter_map(|s| s.department.clone()))
            .await?;
        let designations: HashMap<String, Designation> = self
            .store
            .find_by_ids(staff.values().filter_map(|s| s.designation.clone()))
            .await?;

        Ok(assignments
            .into_iter()
            .map(|a| {
                let profile = staff.get(&a.employee_id);
                let project = projects.get(&a.project_id);
                let department = profile.and_then(|p| p.department.clone()).unwrap_or_default();
                let designation = profile.and_then(|p| p.designation.clone()).unwrap_or_default();

                AssignmentResponse {
                    employee_name: profile.map(|p| p.name.clone()).unwrap_or_default(),
                    employee_code: profile.map(|p| p.employee_code.clone()).unwrap_or_default(),
                    department: departments
                        .get(&department)
                        .map(|d| d.department_name.clone())
                        .unwrap_or(department),
                    designation: designations
                        .get(&designation)
                        .map(|d| d.designation_name.clone())
                        .unwrap_or(designation),
                    project_name: project.map(|p| p.name.clone()).unwrap_or_default(),
                    project_code: project.map(|p| p.code.clone()).unwrap_or_default(),
                    status: a.status.label(),
                    id: a.id,
                    employee_id: a.employee_id,
                    project_id: a.project_id,
                    role: a.role,
                    allocation_percentage: a.allocation_percentage,
                    start_date: a.start_date,
                    end_date: a.end_date,
                    hourly_rate: a.hourly_rate,
                    assigned_date: a.assigned_date,
                    assigned_by: a.assigned_by,
                    created_at: a.created_at,
                    updated_at: a.updated_at,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::department::CreateDepartment;
    use crate::model::project::CreateProject;
    use crate::service::department::DepartmentService;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use crate::service::project::ProjectService;
    use chrono::NaiveDate;

    struct Fixture {
        service: EmployeeAssignmentService,
        master_id: String,
        project_id: String,
    }

    async fn fixture() -> Fixture {
        let store = Store::in_memory();
        let department = DepartmentService::new(store.clone())
            .create(CreateDepartment {
                department_name: "Engineering".into(),
                department_code: "ENG".into(),
                description: None,
                location_id: None,
                employee_count: None,
                is_active: None,
            })
            .await
            .unwrap();
        let mut dto = new_employee("Ann", "Lee", Some("E-7"));
        dto.department_id = Some(department.department.id);
        let master = EmployeeService::new(store.clone()).create(dto).await.unwrap().employee;
        let project = ProjectService::new(store.clone())
            .create(CreateProject {
                name: "Bridge".into(),
                code: "BR".into(),
                description: None,
                category_id: None,
                status: None,
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap();

        Fixture {
            service: EmployeeAssignmentService::new(store),
            master_id: master.id,
            project_id: project.id,
        }
    }

    fn dto(f: &Fixture, employee_id: &str) -> CreateAssignment {
        CreateAssignment {
            employee_id: employee_id.into(),
            project_id: f.project_id.clone(),
            role: "Engineer".into(),
            allocation_percentage: 50.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            hourly_rate: None,
            status: None,
            assigned_by: None,
        }
    }

    #[actix_web::test]
    async fn master_id_is_projected_and_response_labelled() {
        let f = fixture().await;
        let created = f.service.create(dto(&f, &f.master_id)).await.unwrap();

        assert_ne!(created.employee_id, f.master_id);
        assert_eq!(created.employee_code, "E-7");
        assert_eq!(created.employee_name, "Ann Lee");
        assert_eq!(created.department, "Engineering");
        assert_eq!(created.designation, "");
        assert_eq!(created.project_code, "BR");
        assert_eq!(created.status, "Active");
    }

    #[actix_web::test]
    async fn second_active_assignment_conflicts_until_first_is_closed() {
        let f = fixture().await;
        let first = f.service.create(dto(&f, &f.master_id)).await.unwrap();

        // Staff profile id and master id resolve to the same person.
        let err = f.service.create(dto(&f, &first.employee_id)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let closed = f
            .service
            .update(
                &first.id,
                UpdateAssignment { status: Some(AssignmentStatus::Completed), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(closed.status, "Completed");

        f.service.create(dto(&f, &f.master_id)).await.unwrap();
        let all = f.service.list(AssignmentQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[actix_web::test]
    async fn unknown_employee_or_project_is_not_found() {
        let f = fixture().await;
        assert!(matches!(f.service.create(dto(&f, "ghost")).await, Err(ApiError::NotFound(_))));

        let mut bad = dto(&f, &f.master_id);
        bad.project_id = "ghost".into();
        assert!(matches!(f.service.create(bad).await, Err(ApiError::NotFound(_))));
    }

    #[actix_web::test]
    async fn on_hold_label_and_status_filter() {
        let f = fixture().await;
        let mut held = dto(&f, &f.master_id);
        held.status = Some(AssignmentStatus::OnHold);
        let created = f.service.create(held).await.unwrap();
        assert_eq!(created.status, "On Hold");

        let found = f
            .service
            .list(AssignmentQuery { status: Some("on_hold".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
