use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::attendance_regularization::{
    AttendanceRegularization, CreateRegularization, RegularizationQuery, RegularizationStatus,
    UpdateRegularization,
};
use crate::model::employee::EmployeeMaster;
use crate::model::enum_value;
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, now, parse_filter};

#[derive(Clone)]
pub struct RegularizationService {
    store: Store,
}

impl RegularizationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateRegularization) -> ApiResult<AttendanceRegularization> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;

        let now = now();
        let request = AttendanceRegularization {
            id: new_id(),
            employee_master_id: dto.employee_master_id,
            date: dto.date,
            original_check_in: dto.original_check_in,
            original_check_out: dto.original_check_out,
            requested_check_in: dto.requested_check_in,
            requested_check_out: dto.requested_check_out,
            reason: dto.reason,
            supporting_document: dto.supporting_document,
            status: RegularizationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_remarks: None,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&request).await?;

        info!(id = %request.id, employee_id = %request.employee_master_id, date = %request.date, "Regularization requested");
        Ok(request)
    }

    pub async fn list(&self, query: RegularizationQuery) -> ApiResult<Vec<AttendanceRegularization>> {
        let mut filter = Filter::new().eq_opt(
            "employee_master_id",
            query.employee_master_id.filter(|v| !v.is_empty()),
        );
        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: RegularizationStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }

        Ok(self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<AttendanceRegularization> {
        ensure_exists(&self.store, id).await
    }

    /// Only pending requests can be edited.
    pub async fn update(&self, id: &str, dto: UpdateRegularization) -> ApiResult<AttendanceRegularization> {
        let current: AttendanceRegularization = ensure_exists(&self.store, id).await?;
        ensure_pending(&current)?;

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn approve(
        &self,
        id: &str,
        reviewer: &str,
        remarks: Option<String>,
    ) -> ApiResult<AttendanceRegularization> {
        self.review(id, RegularizationStatus::Approved, reviewer, remarks).await
    }

    pub async fn reject(
        &self,
        id: &str,
        reviewer: &str,
        remarks: Option<String>,
    ) -> ApiResult<AttendanceRegularization> {
        self.review(id, RegularizationStatus::Rejected, reviewer, remarks).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<AttendanceRegularization>(&self.store, id).await
    }

    async fn review(
        &self,
        id: &str,
        status: RegularizationStatus,
        reviewer: &str,
        remarks: Option<String>,
    ) -> ApiResult<AttendanceRegularization> {
        let mut request: AttendanceRegularization = ensure_exists(&self.store, id).await?;
        ensure_pending(&request)?;

        let now = now();
        request.status = status;
        request.reviewed_by = Some(reviewer.to_string());
        request.reviewed_at = Some(now);
        request.review_remarks = remarks;
        request.updated_at = now;
        self.store.update(&request).await?;

        info!(id, reviewer, status = %status, "Regularization reviewed");
        Ok(request)
    }
}

fn ensure_pending(request: &AttendanceRegularization) -> ApiResult<()> {
    if request.status == RegularizationStatus::Pending {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Regularization is already {}",
            request.status.as_ref().to_lowercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use chrono::NaiveDate;

    async fn setup() -> (RegularizationService, String) {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", None))
            .await
            .unwrap()
            .employee;
        (RegularizationService::new(store), employee.id)
    }

    fn dto(employee_id: &str) -> CreateRegularization {
        CreateRegularization {
            employee_master_id: employee_id.into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
            original_check_in: Some("10:15".into()),
            original_check_out: None,
            requested_check_in: "09:00".into(),
            requested_check_out: "18:00".into(),
            reason: "Badge reader offline".into(),
            supporting_document: None,
        }
    }

    #[actix_web::test]
    async fn approve_records_the_reviewer() {
        let (service, employee_id) = setup().await;
        let created = service.create(dto(&employee_id)).await.unwrap();
        assert_eq!(created.status, RegularizationStatus::Pending);

        let approved = service
            .approve(&created.id, "user-7", Some("ok".into()))
            .await
            .unwrap();
        assert_eq!(approved.status, RegularizationStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("user-7"));
        assert!(approved.reviewed_at.is_some());
        assert_eq!(approved.review_remarks.as_deref(), Some("ok"));
    }

    #[actix_web::test]
    async fn reviewed_requests_are_final() {
        let (service, employee_id) = setup().await;
        let created = service.create(dto(&employee_id)).await.unwrap();
        service.reject(&created.id, "user-7", None).await.unwrap();

        assert!(matches!(
            service.approve(&created.id, "user-7", None).await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            service.update(&created.id, UpdateRegularization::default()).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[actix_web::test]
    async fn list_by_status() {
        let (service, employee_id) = setup().await;
        let first = service.create(dto(&employee_id)).await.unwrap();
        service.create(dto(&employee_id)).await.unwrap();
        service.approve(&first.id, "user-7", None).await.unwrap();

        let pending = service
            .list(RegularizationQuery { status: Some("pending".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert!(matches!(
            service
                .list(RegularizationQuery { status: Some("maybe".into()), ..Default::default() })
                .await,
            Err(ApiError::BadRequest(_))
        ));
    }
}
