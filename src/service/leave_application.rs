use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeMaster;
use crate::model::leave_application::{
    CreateLeaveApplication, LeaveApplication, LeaveApplicationQuery, LeaveApplicationResponse,
    LeaveStatus, UpdateLeaveApplication,
};
use crate::model::leave_policy::LeavePolicy;
use crate::model::{enum_value, timestamp};
use crate::store::{Condition, Filter, Query, Store, new_id};

use super::guards::{delete_record, ensure_exists, now, parse_filter};

const NO_REASON: &str = "No reason provided";

/// Inclusive calendar-day count of a leave period.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> ApiResult<i64> {
    if start > end {
        return Err(ApiError::BadRequest("Start date cannot be after end date".into()));
    }
    Ok((end - start).num_days() + 1)
}

/// `LA-<year>-<seq>`, the sequence zero-padded to four digits.
pub fn application_number(year: i32, seq: u64) -> String {
    format!("LA-{}-{:04}", year, seq)
}

fn sequence_scope(year: i32) -> String {
    format!("leave_application:{}", year)
}

pub(crate) fn start_of_day(date: NaiveDate) -> String {
    timestamp::format(&date.and_time(NaiveTime::MIN).and_utc())
}

pub(crate) fn end_of_day(date: NaiveDate) -> String {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    timestamp::format(&date.and_time(last).and_utc())
}

#[derive(Clone)]
pub struct LeaveApplicationService {
    store: Store,
}

impl LeaveApplicationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateLeaveApplication) -> ApiResult<LeaveApplicationResponse> {
        self.create_at(dto, now()).await
    }

    /// Creates an application as if submitted at `applied_at`; the number's
    /// year is taken from it.
    pub async fn create_at(
        &self,
        dto: CreateLeaveApplication,
        applied_at: DateTime<Utc>,
    ) -> ApiResult<LeaveApplicationResponse> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;
        ensure_exists::<LeavePolicy>(&self.store, &dto.leave_policy_id).await?;
        let total_days = leave_days(dto.start_date, dto.end_date)?;

        let year = applied_at.year();
        let seq = self.store.next_sequence(&sequence_scope(year)).await?;

        let now = now();
        let application = LeaveApplication {
            id: new_id(),
            application_number: application_number(year, seq),
            employee_master_id: dto.employee_master_id,
            leave_policy_id: dto.leave_policy_id,
            start_date: dto.start_date,
            end_date: dto.end_date,
            total_days,
            reason: dto.reason,
            status: LeaveStatus::Pending,
            applied_date: applied_at,
            approved_by: None,
            approved_date: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&application).await?;

        info!(
            id = %application.id,
            number = %application.application_number,
            total_days,
            "Leave application submitted"
        );
        self.respond_one(application).await
    }

    pub async fn list(&self, query: LeaveApplicationQuery) -> ApiResult<Vec<LeaveApplicationResponse>> {
        let mut filter =
            Filter::new().eq_opt("employee_master_id", query.employee_master_id.filter(|v| !v.is_empty()));

        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: LeaveStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        if let Some(start) = query.start_date {
            filter = filter.gte("applied_date", start_of_day(start));
        }
        if let Some(end) = query.end_date {
            filter = filter.lte("applied_date", end_of_day(end));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let employee_ids: Vec<String> = self
                .store
                .find_many::<EmployeeMaster>(Query::new(Filter::new().any(vec![
                    Condition::Contains("first_name", term.to_string()),
                    Condition::Contains("last_name", term.to_string()),
                    Condition::Contains("employee_code", term.to_string()),
                ])))
                .await?
                .into_iter()
                .map(|e| e.id)
                .collect();

            filter = filter.any(vec![
                Condition::Contains("application_number", term.to_string()),
                Condition::Contains("reason", term.to_string()),
                Condition::In("employee_master_id", employee_ids.into_iter().map(Into::into).collect()),
            ]);
        }

        let applications = self
            .store
            .find_many(Query::new(filter).newest_first("applied_date"))
            .await?;
        self.respond(applications).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<LeaveApplicationResponse> {
        let application: LeaveApplication = ensure_exists(&self.store, id).await?;
        self.respond_one(application).await
    }

    /// `actor` is recorded as approver when the patch approves the application.
    pub async fn update(
        &self,
        id: &str,
        dto: UpdateLeaveApplication,
        actor: &str,
    ) -> ApiResult<LeaveApplicationResponse> {
        let mut application: LeaveApplication = ensure_exists(&self.store, id).await?;

        if let Some(employee_id) = dto.employee_master_id {
            ensure_exists::<EmployeeMaster>(&self.store, &employee_id).await?;
            application.employee_master_id = employee_id;
        }
        if let Some(policy_id) = dto.leave_policy_id {
            ensure_exists::<LeavePolicy>(&self.store, &policy_id).await?;
            application.leave_policy_id = policy_id;
        }
        if dto.start_date.is_some() || dto.end_date.is_some() {
            let start = dto.start_date.unwrap_or(application.start_date);
            let end = dto.end_date.unwrap_or(application.end_date);
            application.total_days = leave_days(start, end)?;
            application.start_date = start;
            application.end_date = end;
        }
        if let Some(reason) = dto.reason {
            application.reason = reason;
        }
        if let Some(status) = dto.status {
            apply_status(&mut application, status, actor, dto.rejection_reason);
        }

        application.updated_at = now();
        self.store.update(&application).await?;
        self.respond_one(application).await
    }

    /// Marks the application approved by `approver`.
    pub async fn approve(&self, id: &str, approver: &str) -> ApiResult<LeaveApplicationResponse> {
        let mut application: LeaveApplication = ensure_exists(&self.store, id).await?;
        apply_status(&mut application, LeaveStatus::Approved, approver, None);
        application.updated_at = now();
        self.store.update(&application).await?;

        info!(id, approver, "Leave application approved");
        self.respond_one(application).await
    }

    pub async fn reject(
        &self,
        id: &str,
        reviewer: &str,
        reason: Option<String>,
    ) -> ApiResult<LeaveApplicationResponse> {
        let mut application: LeaveApplication = ensure_exists(&self.store, id).await?;
        apply_status(&mut application, LeaveStatus::Rejected, reviewer, reason);
        application.updated_at = now();
        self.store.update(&application).await?;

        info!(id, reviewer, "Leave application rejected");
        self.respond_one(application).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<LeaveApplication>(&self.store, id).await
    }

    async fn respond_one(&self, application: LeaveApplication) -> ApiResult<LeaveApplicationResponse> {
        self.respond(vec![application]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, applications: Vec<LeaveApplication>) -> ApiResult<Vec<LeaveApplicationResponse>> {
        let employees: HashMap<String, EmployeeMaster> = self
            .store
            .find_by_ids(applications.iter().map(|a| a.employee_master_id.clone()))
            .await?;
        let policies: HashMap<String, LeavePolicy> = self
            .store
            .find_by_ids(applications.iter().map(|a| a.leave_policy_id.clone()))
            .await?;

        Ok(applications
            .into_iter()
            .map(|a| {
                let employee = employees.get(&a.employee_master_id);
                LeaveApplicationResponse {
                    employee_name: employee.map(EmployeeMaster::full_name),
                    employee_code: employee.map(|e| e.employee_code.clone()),
                    department: employee.and_then(|e| e.department_id.clone()),
                    leave_type: policies.get(&a.leave_policy_id).map(|p| p.leave_type.clone()),
                    applied_date: a.applied_date.date_naive(),
                    approved_date: a.approved_date.map(|d| d.date_naive()),
                    id: a.id,
                    application_number: a.application_number,
                    employee_master_id: a.employee_master_id,
                    leave_policy_id: a.leave_policy_id,
                    start_date: a.start_date,
                    end_date: a.end_date,
                    total_days: a.total_days,
                    reason: a.reason,
                    status: a.status,
                    approved_by: a.approved_by,
                    rejection_reason: a.rejection_reason,
                    created_at: a.created_at,
                    updated_at: a.updated_at,
                }
            })
            .collect())
    }
}

fn apply_status(
    application: &mut LeaveApplication,
    status: LeaveStatus,
    actor: &str,
    rejection_reason: Option<String>,
) {
    application.status = status;
    match status {
        LeaveStatus::Approved => {
            application.approved_date = Some(now());
            application.approved_by = Some(actor.to_string());
            application.rejection_reason = None;
        }
        LeaveStatus::Rejected => {
            application.approved_by = None;
            application.approved_date = None;
            application.rejection_reason = Some(
                rejection_reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| NO_REASON.to_string()),
            );
        }
        // back to an undecided state
        LeaveStatus::Pending => {
            application.approved_by = None;
            application.approved_date = None;
            application.rejection_reason = None;
        }
        LeaveStatus::Cancelled => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use crate::service::leave_policy::{LeavePolicyService, tests::annual};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        service: LeaveApplicationService,
        store: Store,
        employee_id: String,
        policy_id: String,
    }

    async fn fixture() -> Fixture {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", Some("E-9")))
            .await
            .unwrap()
            .employee;
        let policy = LeavePolicyService::new(store.clone()).create(annual("AL")).await.unwrap();
        Fixture {
            service: LeaveApplicationService::new(store.clone()),
            store,
            employee_id: employee.id,
            policy_id: policy.id,
        }
    }

    fn dto(f: &Fixture, start: NaiveDate, end: NaiveDate) -> CreateLeaveApplication {
        CreateLeaveApplication {
            employee_master_id: f.employee_id.clone(),
            leave_policy_id: f.policy_id.clone(),
            start_date: start,
            end_date: end,
            reason: "Family trip".into(),
        }
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(leave_days(date(2025, 3, 10), date(2025, 3, 10)).unwrap(), 1);
        assert_eq!(leave_days(date(2025, 3, 10), date(2025, 3, 12)).unwrap(), 3);
        assert_eq!(leave_days(date(2024, 2, 28), date(2024, 3, 1)).unwrap(), 3);
        assert!(leave_days(date(2025, 3, 12), date(2025, 3, 10)).is_err());
    }

    #[test]
    fn numbers_are_padded() {
        assert_eq!(application_number(2025, 1), "LA-2025-0001");
        assert_eq!(application_number(2025, 10000), "LA-2025-10000");
    }

    #[actix_web::test]
    async fn numbers_are_sequential_per_year() {
        let f = fixture().await;
        let in_2025 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let in_2026 = Utc.with_ymd_and_hms(2026, 1, 2, 9, 0, 0).unwrap();
        let period = || dto(&f, date(2025, 7, 1), date(2025, 7, 2));

        let first = f.service.create_at(period(), in_2025).await.unwrap();
        let second = f.service.create_at(period(), in_2025).await.unwrap();
        let next_year = f.service.create_at(period(), in_2026).await.unwrap();

        assert_eq!(first.application_number, "LA-2025-0001");
        assert_eq!(second.application_number, "LA-2025-0002");
        assert_eq!(next_year.application_number, "LA-2026-0001");
        assert_eq!(first.total_days, 2);
        assert_eq!(first.status, LeaveStatus::Pending);
        assert_eq!(first.employee_name.as_deref(), Some("Ann Lee"));
        assert_eq!(first.leave_type.as_deref(), Some("ANNUAL"));
    }

    #[actix_web::test]
    async fn inverted_period_persists_nothing() {
        let f = fixture().await;
        let err = f.service.create(dto(&f, date(2025, 3, 12), date(2025, 3, 10))).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(f.store.count::<LeaveApplication>(Filter::new()).await.unwrap(), 0);

        // The rejected request did not consume a number.
        let ok = f.service.create(dto(&f, date(2025, 3, 10), date(2025, 3, 10))).await.unwrap();
        assert!(ok.application_number.ends_with("-0001"));
    }

    #[actix_web::test]
    async fn update_recomputes_days_from_merged_bounds() {
        let f = fixture().await;
        let created = f.service.create(dto(&f, date(2025, 3, 10), date(2025, 3, 12))).await.unwrap();

        let updated = f
            .service
            .update(
                &created.id,
                UpdateLeaveApplication { end_date: Some(date(2025, 3, 14)), ..Default::default() },
                "user-hr",
            )
            .await
            .unwrap();
        assert_eq!(updated.total_days, 5);

        let err = f
            .service
            .update(
                &created.id,
                UpdateLeaveApplication { start_date: Some(date(2025, 3, 20)), ..Default::default() },
                "user-hr",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn approve_and_reject_record_side_fields() {
        let f = fixture().await;
        let a = f.service.create(dto(&f, date(2025, 3, 10), date(2025, 3, 10))).await.unwrap();
        let b = f.service.create(dto(&f, date(2025, 4, 10), date(2025, 4, 10))).await.unwrap();

        let approved = f.service.approve(&a.id, "user-hr").await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("user-hr"));
        assert!(approved.approved_date.is_some());

        let rejected = f.service.reject(&b.id, "user-hr", None).await.unwrap();
        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some(NO_REASON));
    }

    #[actix_web::test]
    async fn decisions_replace_the_opposite_side_fields() {
        let f = fixture().await;
        let a = f.service.create(dto(&f, date(2025, 3, 10), date(2025, 3, 10))).await.unwrap();

        let rejected = f.service.reject(&a.id, "user-hr", Some("Busy week".into())).await.unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Busy week"));

        let approved = f.service.approve(&a.id, "user-admin").await.unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some("user-admin"));
        assert!(approved.rejection_reason.is_none());

        let rejected = f.service.reject(&a.id, "user-hr", None).await.unwrap();
        assert!(rejected.approved_by.is_none());
        assert!(rejected.approved_date.is_none());
        assert_eq!(rejected.rejection_reason.as_deref(), Some(NO_REASON));
    }

    #[actix_web::test]
    async fn patch_to_approved_records_the_actor() {
        let f = fixture().await;
        let a = f.service.create(dto(&f, date(2025, 3, 10), date(2025, 3, 10))).await.unwrap();

        let approved = f
            .service
            .update(
                &a.id,
                UpdateLeaveApplication { status: Some(LeaveStatus::Approved), ..Default::default() },
                "user-hr",
            )
            .await
            .unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("user-hr"));
        assert!(approved.approved_date.is_some());

        let reopened = f
            .service
            .update(
                &a.id,
                UpdateLeaveApplication { status: Some(LeaveStatus::Pending), ..Default::default() },
                "user-hr",
            )
            .await
            .unwrap();
        assert!(reopened.approved_by.is_none() && reopened.approved_date.is_none());
    }

    #[actix_web::test]
    async fn list_filters_status_range_and_search() {
        let f = fixture().await;
        let march = Utc.with_ymd_and_hms(2025, 3, 5, 23, 30, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2025, 4, 5, 8, 0, 0).unwrap();
        let a = f.service.create_at(dto(&f, date(2025, 3, 10), date(2025, 3, 10)), march).await.unwrap();
        f.service.create_at(dto(&f, date(2025, 4, 10), date(2025, 4, 10)), april).await.unwrap();
        f.service.approve(&a.id, "hr").await.unwrap();

        let approved = f
            .service
            .list(LeaveApplicationQuery { status: Some("approved".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);

        let in_march = f
            .service
            .list(LeaveApplicationQuery {
                start_date: Some(date(2025, 3, 1)),
                end_date: Some(date(2025, 3, 5)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_march.len(), 1);
        assert_eq!(in_march[0].id, a.id);

        let by_code = f
            .service
            .list(LeaveApplicationQuery { search: Some("e-9".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(by_code.len(), 2);
        assert_eq!(by_code[0].applied_date, date(2025, 4, 5));

        let by_number = f
            .service
            .list(LeaveApplicationQuery { search: Some("0002".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(by_number.len(), 1);
    }
}
