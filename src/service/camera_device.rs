use tracing::info;

use crate::error::ApiResult;
use crate::model::camera_device::{CameraDevice, CreateCameraDevice, UpdateCameraDevice};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct CameraDeviceService {
    store: Store,
}

impl CameraDeviceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateCameraDevice) -> ApiResult<CameraDevice> {
        ensure_code_available::<CameraDevice>(&self.store, "device_code", &dto.device_code, None).await?;

        let now = now();
        let device = CameraDevice {
            id: new_id(),
            device_name: dto.device_name,
            device_code: dto.device_code,
            location: dto.location,
            ip_address: dto.ip_address,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&device).await?;

        info!(id = %device.id, code = %device.device_code, "Camera device registered");
        Ok(device)
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<CameraDevice>> {
        let filter = Filter::new().eq_opt("is_active", is_active);
        Ok(self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<CameraDevice> {
        ensure_exists(&self.store, id).await
    }

    pub async fn update(&self, id: &str, dto: UpdateCameraDevice) -> ApiResult<CameraDevice> {
        let current: CameraDevice = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.device_code.as_deref().filter(|c| *c != current.device_code) {
            ensure_code_available::<CameraDevice>(&self.store, "device_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<CameraDevice>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<CameraDevice> {
        toggle_active(&self.store, id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiError;

    pub(crate) fn camera(code: &str) -> CreateCameraDevice {
        CreateCameraDevice {
            device_name: "Lobby".into(),
            device_code: code.into(),
            location: "Main Entrance".into(),
            ip_address: Some("10.0.0.20".into()),
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn duplicate_device_code_conflicts() {
        let service = CameraDeviceService::new(Store::in_memory());
        service.create(camera("CAM-01")).await.unwrap();
        assert!(matches!(service.create(camera("CAM-01")).await, Err(ApiError::Conflict(_))));
    }

    #[actix_web::test]
    async fn toggle_leaves_updated_at_alone() {
        let service = CameraDeviceService::new(Store::in_memory());
        let created = service.create(camera("CAM-01")).await.unwrap();
        let toggled = service.toggle_active(&created.id).await.unwrap();
        assert!(!toggled.is_active);
        assert_eq!(toggled.updated_at, created.updated_at);
        assert_eq!(toggled.device_name, created.device_name);
    }
}
