use tracing::info;

use crate::error::ApiResult;
use crate::model::designation::{CreateDesignation, Designation, UpdateDesignation};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct DesignationService {
    store: Store,
}

impl DesignationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateDesignation) -> ApiResult<Designation> {
        ensure_code_available::<Designation>(&self.store, "designation_code", &dto.designation_code, None)
            .await?;

        let now = now();
        let designation = Designation {
            id: new_id(),
            designation_name: dto.designation_name,
            designation_code: dto.designation_code,
            department: dto.department,
            level: dto.level,
            description: dto.description,
            employee_count: dto.employee_count.unwrap_or(0),
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&designation).await?;

        info!(id = %designation.id, code = %designation.designation_code, "Designation created");
        Ok(designation)
    }

    pub async fn list(&self, is_active: Option<bool>, department: Option<String>) -> ApiResult<Vec<Designation>> {
        let filter = Filter::new()
            .eq_opt("is_active", is_active)
            .eq_opt("department", department.filter(|d| !d.is_empty()));
        Ok(self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Designation> {
        ensure_exists(&self.store, id).await
    }

    pub async fn update(&self, id: &str, dto: UpdateDesignation) -> ApiResult<Designation> {
        let current: Designation = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.designation_code.as_deref().filter(|c| *c != current.designation_code) {
            ensure_code_available::<Designation>(&self.store, "designation_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<Designation>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<Designation> {
        toggle_active(&self.store, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn dto(code: &str, department: Option<&str>) -> CreateDesignation {
        CreateDesignation {
            designation_name: "Engineer".into(),
            designation_code: code.into(),
            department: department.map(Into::into),
            level: None,
            description: None,
            employee_count: None,
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn duplicate_code_conflicts() {
        let service = DesignationService::new(Store::in_memory());
        service.create(dto("SE", None)).await.unwrap();
        assert!(matches!(service.create(dto("SE", None)).await, Err(ApiError::Conflict(_))));
    }

    #[actix_web::test]
    async fn list_filters_by_department() {
        let service = DesignationService::new(Store::in_memory());
        service.create(dto("SE", Some("Engineering"))).await.unwrap();
        service.create(dto("AC", Some("Finance"))).await.unwrap();

        let found = service.list(None, Some("Finance".into())).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].designation_code, "AC");
    }
}
