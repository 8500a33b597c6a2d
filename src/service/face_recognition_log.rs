use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::camera_device::CameraDevice;
use crate::model::employee::EmployeeMaster;
use crate::model::enum_value;
use crate::model::face_recognition_log::{
    CreateFaceLog, FaceLogQuery, FaceLogResponse, FaceLogStatistics, FaceRecognitionLog, RecognitionStatus,
    UpdateFaceLog,
};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, ensure_optional, now, parse_filter};
use super::leave_application::{end_of_day, start_of_day};
use super::roster::{EmployeeCard, UNKNOWN, load_cards};

pub const DEFAULT_LIST_LIMIT: u64 = 100;
pub const DEFAULT_RECENT_LIMIT: u64 = 50;

fn within(filter: Filter, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Filter {
    let filter = match start {
        Some(start) => filter.gte("recognition_time", start_of_day(start)),
        None => filter,
    };
    match end {
        Some(end) => filter.lte("recognition_time", end_of_day(end)),
        None => filter,
    }
}

#[derive(Clone)]
pub struct FaceLogService {
    store: Store,
}

impl FaceLogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateFaceLog) -> ApiResult<FaceLogResponse> {
        let camera: CameraDevice = ensure_exists(&self.store, &dto.camera_device_id).await?;
        let employee_id = dto.employee_master_id.filter(|id| !id.is_empty());
        ensure_optional::<EmployeeMaster>(&self.store, employee_id.as_deref()).await?;

        let now = now();
        let log = FaceRecognitionLog {
            id: new_id(),
            employee_master_id: employee_id,
            camera_device_id: camera.id.clone(),
            recognition_time: dto.recognition_time.unwrap_or(now),
            status: dto.status.unwrap_or_default(),
            confidence: dto.confidence,
            image_url: dto.image_url,
            location: dto.location.filter(|l| !l.is_empty()).or(Some(camera.location)),
            remarks: dto.remarks,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&log).await?;

        info!(id = %log.id, camera_id = %log.camera_device_id, status = %log.status, "Face recognition logged");
        self.respond_one(log).await
    }

    pub async fn list(&self, query: FaceLogQuery) -> ApiResult<Vec<FaceLogResponse>> {
        let mut filter = Filter::new()
            .eq_opt("camera_device_id", query.camera_device_id.filter(|v| !v.is_empty()))
            .eq_opt("employee_master_id", query.employee_master_id.filter(|v| !v.is_empty()));
        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: RecognitionStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        let filter = within(filter, query.start_date, query.end_date);

        let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIST_LIMIT);
        let logs = self
            .store
            .find_many(Query::new(filter).newest_first("recognition_time").limit(limit))
            .await?;
        self.respond(logs).await
    }

    pub async fn recent(&self, limit: Option<u64>) -> ApiResult<Vec<FaceLogResponse>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_RECENT_LIMIT);
        let logs = self
            .store
            .find_many(Query::new(Filter::new()).newest_first("recognition_time").limit(limit))
            .await?;
        self.respond(logs).await
    }

    pub async fn statistics(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> ApiResult<FaceLogStatistics> {
        let base = within(Filter::new(), start, end);
        let count = |status: RecognitionStatus| {
            let filter = base.clone().eq("status", enum_value(&status));
            async move { self.store.count::<FaceRecognitionLog>(filter).await }
        };

        let (total, recognized, failed, unknown) = futures::try_join!(
            self.store.count::<FaceRecognitionLog>(base.clone()),
            count(RecognitionStatus::Recognized),
            count(RecognitionStatus::Failed),
            count(RecognitionStatus::Unknown),
        )?;
        Ok(FaceLogStatistics { total, recognized, failed, unknown })
    }

    pub async fn get(&self, id: &str) -> ApiResult<FaceLogResponse> {
        let log: FaceRecognitionLog = ensure_exists(&self.store, id).await?;
        self.respond_one(log).await
    }

    pub async fn update(&self, id: &str, dto: UpdateFaceLog) -> ApiResult<FaceLogResponse> {
        let current: FaceRecognitionLog = ensure_exists(&self.store, id).await?;
        if let Some(camera_id) = dto.camera_device_id.as_deref() {
            ensure_exists::<CameraDevice>(&self.store, camera_id).await?;
        }
        ensure_optional::<EmployeeMaster>(&self.store, dto.employee_master_id.as_deref()).await?;

        let mut updated = apply_patch(&current, &dto)?;
        if dto.employee_master_id.as_deref() == Some("") {
            updated.employee_master_id = None;
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<FaceRecognitionLog>(&self.store, id).await
    }

    async fn respond_one(&self, log: FaceRecognitionLog) -> ApiResult<FaceLogResponse> {
        self.respond(vec![log]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, logs: Vec<FaceRecognitionLog>) -> ApiResult<Vec<FaceLogResponse>> {
        let cards = load_cards(&self.store, logs.iter().filter_map(|l| l.employee_master_id.clone())).await?;
        let cameras: HashMap<String, CameraDevice> = self
            .store
            .find_by_ids(logs.iter().map(|l| l.camera_device_id.clone()))
            .await?;

        Ok(logs
            .into_iter()
            .map(|log| {
                let card = log
                    .employee_master_id
                    .as_ref()
                    .and_then(|id| cards.get(id))
                    .cloned()
                    .unwrap_or_else(EmployeeCard::unknown);
                let camera_location = log
                    .location
                    .clone()
                    .filter(|l| !l.is_empty())
                    .or_else(|| cameras.get(&log.camera_device_id).map(|c| c.location.clone()))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                FaceLogResponse {
                    id: log.id,
                    employee_id: log.employee_master_id.unwrap_or_default(),
                    employee_code: card.code,
                    employee_name: card.name,
                    department: card.department,
                    designation: card.designation,
                    camera_location,
                    recognition_time: log.recognition_time,
                    status: log.status.label(),
                    confidence: log.confidence,
                    image_url: log.image_url,
                    camera_device_id: log.camera_device_id,
                    created_at: log.created_at,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::camera_device::{CameraDeviceService, tests::camera};
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use crate::service::roster::NOT_ASSIGNED;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        service: FaceLogService,
        camera_id: String,
        employee_id: String,
    }

    async fn setup() -> Fixture {
        let store = Store::in_memory();
        let camera = CameraDeviceService::new(store.clone()).create(camera("CAM-01")).await.unwrap();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", Some("E-1")))
            .await
            .unwrap()
            .employee;
        Fixture { service: FaceLogService::new(store), camera_id: camera.id, employee_id: employee.id }
    }

    fn log(camera_id: &str, employee_id: Option<&str>, status: Option<RecognitionStatus>, day: u32) -> CreateFaceLog {
        CreateFaceLog {
            employee_master_id: employee_id.map(Into::into),
            camera_device_id: camera_id.into(),
            recognition_time: Some(Utc.with_ymd_and_hms(2025, 7, day, 8, 30, 0).unwrap()),
            status,
            confidence: Some(0.9),
            image_url: None,
            location: None,
            remarks: None,
        }
    }

    #[actix_web::test]
    async fn defaults_come_from_the_camera() {
        let f = setup().await;
        let created = f.service.create(log(&f.camera_id, None, None, 1)).await.unwrap();

        assert_eq!(created.status, "Unknown");
        assert_eq!(created.camera_location, "Main Entrance");
        assert_eq!(created.employee_name, "Unknown");
        assert_eq!(created.employee_id, "");
        assert_eq!(created.department, NOT_ASSIGNED);
    }

    #[actix_web::test]
    async fn camera_and_employee_must_exist() {
        let f = setup().await;
        assert!(matches!(
            f.service.create(log("ghost", None, None, 1)).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            f.service.create(log(&f.camera_id, Some("ghost"), None, 1)).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn status_filter_accepts_labels() {
        let f = setup().await;
        f.service
            .create(log(&f.camera_id, Some(&f.employee_id), Some(RecognitionStatus::Recognized), 1))
            .await
            .unwrap();
        f.service.create(log(&f.camera_id, None, Some(RecognitionStatus::Failed), 2)).await.unwrap();

        let recognized = f
            .service
            .list(FaceLogQuery { status: Some("Recognized".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(recognized.len(), 1);
        assert_eq!(recognized[0].employee_name, "Ann Lee");
        assert_eq!(recognized[0].status, "Recognized");
    }

    #[actix_web::test]
    async fn recent_is_newest_first_and_limited() {
        let f = setup().await;
        for day in 1..=4 {
            f.service.create(log(&f.camera_id, None, None, day)).await.unwrap();
        }

        let recent = f.service.recent(Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].recognition_time > recent[1].recognition_time);
        assert_eq!(f.service.recent(None).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn statistics_over_a_range() {
        let f = setup().await;
        f.service.create(log(&f.camera_id, None, Some(RecognitionStatus::Recognized), 1)).await.unwrap();
        f.service.create(log(&f.camera_id, None, Some(RecognitionStatus::Failed), 2)).await.unwrap();
        f.service.create(log(&f.camera_id, None, None, 3)).await.unwrap();

        let all = f.service.statistics(None, None).await.unwrap();
        assert_eq!(all, FaceLogStatistics { total: 3, recognized: 1, failed: 1, unknown: 1 });

        let later = f
            .service
            .statistics(NaiveDate::from_ymd_opt(2025, 7, 2), NaiveDate::from_ymd_opt(2025, 7, 3))
            .await
            .unwrap();
        assert_eq!(later, FaceLogStatistics { total: 2, recognized: 0, failed: 1, unknown: 1 });
    }
}
