use tracing::info;

use crate::error::ApiResult;
use crate::model::location::{CreateLocation, Location, UpdateLocation};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct LocationService {
    store: Store,
}

impl LocationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateLocation) -> ApiResult<Location> {
        ensure_code_available::<Location>(&self.store, "branch_code", &dto.branch_code, None).await?;

        let now = now();
        let location = Location {
            id: new_id(),
            branch_name: dto.branch_name,
            branch_code: dto.branch_code,
            address: dto.address,
            city: dto.city,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&location).await?;

        info!(id = %location.id, code = %location.branch_code, "Location created");
        Ok(location)
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<Location>> {
        let filter = Filter::new().eq_opt("is_active", is_active);
        Ok(self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Location> {
        ensure_exists(&self.store, id).await
    }

    pub async fn update(&self, id: &str, dto: UpdateLocation) -> ApiResult<Location> {
        let current: Location = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.branch_code.as_deref().filter(|c| *c != current.branch_code) {
            ensure_code_available::<Location>(&self.store, "branch_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<Location>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<Location> {
        toggle_active(&self.store, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn dto(code: &str) -> CreateLocation {
        CreateLocation {
            branch_name: "Head Office".into(),
            branch_code: code.into(),
            address: None,
            city: Some("Dhaka".into()),
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn create_defaults_active_and_rejects_duplicate_code() {
        let service = LocationService::new(Store::in_memory());
        let created = service.create(dto("HO")).await.unwrap();
        assert!(created.is_active);

        let err = service.create(dto("HO")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn update_keeps_untouched_fields() {
        let service = LocationService::new(Store::in_memory());
        let created = service.create(dto("HO")).await.unwrap();

        let updated = service
            .update(
                &created.id,
                UpdateLocation { branch_name: Some("HQ".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.branch_name, "HQ");
        assert_eq!(updated.city.as_deref(), Some("Dhaka"));
    }

    #[actix_web::test]
    async fn list_filters_on_active_flag() {
        let service = LocationService::new(Store::in_memory());
        let a = service.create(dto("A")).await.unwrap();
        service.create(dto("B")).await.unwrap();
        service.toggle_active(&a.id).await.unwrap();

        assert_eq!(service.list(Some(true)).await.unwrap().len(), 1);
        assert_eq!(service.list(Some(false)).await.unwrap()[0].id, a.id);
    }

    #[actix_web::test]
    async fn delete_missing_is_not_found() {
        let service = LocationService::new(Store::in_memory());
        assert!(matches!(service.delete("nope").await, Err(ApiError::NotFound(_))));
    }
}
