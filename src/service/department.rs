use tracing::info;

use crate::error::ApiResult;
use crate::model::department::{CreateDepartment, Department, DepartmentResponse, UpdateDepartment};
use crate::model::location::{Location, LocationSummary};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{
    delete_record, ensure_code_available, ensure_exists, ensure_optional, now, toggle_active,
};

#[derive(Clone)]
pub struct DepartmentService {
    store: Store,
}

impl DepartmentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateDepartment) -> ApiResult<DepartmentResponse> {
        ensure_code_available::<Department>(&self.store, "department_code", &dto.department_code, None)
            .await?;
        let location = ensure_optional::<Location>(&self.store, dto.location_id.as_deref()).await?;

        let now = now();
        let department = Department {
            id: new_id(),
            department_name: dto.department_name,
            department_code: dto.department_code,
            description: dto.description,
            location_id: location.as_ref().map(|l| l.id.clone()),
            employee_count: dto.employee_count.unwrap_or(0),
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&department).await?;

        info!(id = %department.id, code = %department.department_code, "Department created");
        Ok(DepartmentResponse {
            department,
            location: location.as_ref().map(LocationSummary::from),
        })
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<DepartmentResponse>> {
        let departments: Vec<Department> = self
            .store
            .find_many(Query::new(Filter::new().eq_opt("is_active", is_active)).newest_first("created_at"))
            .await?;

        let locations = self
            .store
            .find_by_ids::<Location>(departments.iter().filter_map(|d| d.location_id.clone()))
            .await?;

        Ok(departments
            .into_iter()
            .map(|department| {
                let location = department
                    .location_id
                    .as_ref()
                    .and_then(|id| locations.get(id))
                    .map(LocationSummary::from);
                DepartmentResponse { department, location }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> ApiResult<DepartmentResponse> {
        let department: Department = ensure_exists(&self.store, id).await?;
        self.respond(department).await
    }

    pub async fn update(&self, id: &str, dto: UpdateDepartment) -> ApiResult<DepartmentResponse> {
        let current: Department = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.department_code.as_deref().filter(|c| *c != current.department_code) {
            ensure_code_available::<Department>(&self.store, "department_code", code, Some(id)).await?;
        }
        ensure_optional::<Location>(&self.store, dto.location_id.as_deref()).await?;

        let mut updated = apply_patch(&current, &dto)?;
        if dto.location_id.as_deref() == Some("") {
            updated.location_id = None;
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<Department>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<Department> {
        toggle_active(&self.store, id).await
    }

    async fn respond(&self, department: Department) -> ApiResult<DepartmentResponse> {
        let location = match department.location_id.as_deref() {
            Some(id) => self.store.find::<Location>(id).await?,
            None => None,
        };
        Ok(DepartmentResponse {
            department,
            location: location.as_ref().map(LocationSummary::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::location::CreateLocation;
    use crate::service::location::LocationService;

    fn dto(code: &str, location_id: Option<String>) -> CreateDepartment {
        CreateDepartment {
            department_name: "Human Resources".into(),
            department_code: code.into(),
            description: None,
            location_id,
            employee_count: None,
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn duplicate_code_is_conflict_and_existing_unchanged() {
        let service = DepartmentService::new(Store::in_memory());
        let first = service.create(dto("HR", None)).await.unwrap();

        let err = service.create(dto("HR", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let stored = service.get(&first.department.id).await.unwrap();
        assert_eq!(stored.department.department_name, "Human Resources");
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn unknown_location_is_not_found_and_nothing_written() {
        let service = DepartmentService::new(Store::in_memory());
        let err = service.create(dto("HR", Some("missing".into()))).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn list_embeds_location() {
        let store = Store::in_memory();
        let location = LocationService::new(store.clone())
            .create(CreateLocation {
                branch_name: "Head Office".into(),
                branch_code: "HO".into(),
                address: None,
                city: None,
                is_active: None,
            })
            .await
            .unwrap();
        let service = DepartmentService::new(store);
        service.create(dto("HR", Some(location.id.clone()))).await.unwrap();

        let listed = service.list(None).await.unwrap();
        assert_eq!(listed[0].location.as_ref().map(|l| l.branch_code.as_str()), Some("HO"));
    }

    #[actix_web::test]
    async fn renaming_code_to_a_taken_one_conflicts() {
        let service = DepartmentService::new(Store::in_memory());
        service.create(dto("HR", None)).await.unwrap();
        let fin = service.create(dto("FIN", None)).await.unwrap();

        let err = service
            .update(
                &fin.department.id,
                UpdateDepartment { department_code: Some("HR".into()), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Keeping its own code is fine.
        service
            .update(
                &fin.department.id,
                UpdateDepartment { department_code: Some("FIN".into()), ..Default::default() },
            )
            .await
            .unwrap();
    }
}
