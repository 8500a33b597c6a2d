use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::daily_attendance::{
    AttendanceStatus, CreateDailyAttendance, DailyAttendance, DailyAttendanceQuery,
    DailyAttendanceResponse, UpdateDailyAttendance,
};
use crate::model::employee::EmployeeMaster;
use crate::model::enum_value;
use crate::store::{Condition, Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, now, parse_filter};

/// Ids of employees whose name or code contains `term`.
pub(crate) async fn employees_matching(store: &Store, term: &str) -> ApiResult<Vec<String>> {
    let employees: Vec<EmployeeMaster> = store
        .find_many(Query::new(Filter::new().any(vec![
            Condition::Contains("first_name", term.to_string()),
            Condition::Contains("last_name", term.to_string()),
            Condition::Contains("employee_code", term.to_string()),
        ])))
        .await?;
    Ok(employees.into_iter().map(|e| e.id).collect())
}

fn ids_condition(field: &'static str, ids: Vec<String>) -> Condition {
    Condition::In(field, ids.into_iter().map(Into::into).collect())
}

#[derive(Clone)]
pub struct DailyAttendanceService {
    store: Store,
}

impl DailyAttendanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateDailyAttendance) -> ApiResult<DailyAttendanceResponse> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;

        let now = now();
        let attendance = DailyAttendance {
            id: new_id(),
            employee_master_id: dto.employee_master_id,
            date: dto.date,
            check_in: dto.check_in,
            check_out: dto.check_out,
            working_hours: dto.working_hours,
            status: dto.status.unwrap_or_default(),
            location: dto.location,
            remarks: dto.remarks,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&attendance).await?;

        info!(
            id = %attendance.id,
            employee_id = %attendance.employee_master_id,
            date = %attendance.date,
            status = %attendance.status,
            "Attendance recorded"
        );
        self.respond_one(attendance).await
    }

    pub async fn list(&self, query: DailyAttendanceQuery) -> ApiResult<Vec<DailyAttendanceResponse>> {
        let mut filter = Filter::new()
            .eq_opt("employee_master_id", query.employee_id.filter(|v| !v.is_empty()))
            .eq_opt("date", query.date.map(|d| d.to_string()));

        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: AttendanceStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        if let Some(department_id) = query.department_id.filter(|v| !v.is_empty()) {
            let in_department: Vec<EmployeeMaster> = self
                .store
                .find_many(Query::new(Filter::new().eq("department_id", department_id)))
                .await?;
            filter = filter.is_in("employee_master_id", in_department.into_iter().map(|e| e.id));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let employee_ids = employees_matching(&self.store, term).await?;
            filter = filter.any(vec![
                ids_condition("employee_master_id", employee_ids),
                Condition::Contains("location", term.to_string()),
                Condition::Contains("remarks", term.to_string()),
            ]);
        }

        let records = self
            .store
            .find_many(Query::new(filter).newest_first("date"))
            .await?;
        self.respond(records).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<DailyAttendanceResponse> {
        let attendance: DailyAttendance = ensure_exists(&self.store, id).await?;
        self.respond_one(attendance).await
    }

    pub async fn update(&self, id: &str, dto: UpdateDailyAttendance) -> ApiResult<DailyAttendanceResponse> {
        let current: DailyAttendance = ensure_exists(&self.store, id).await?;
        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<DailyAttendance>(&self.store, id).await
    }

    async fn respond_one(&self, attendance: DailyAttendance) -> ApiResult<DailyAttendanceResponse> {
        self.respond(vec![attendance]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, records: Vec<DailyAttendance>) -> ApiResult<Vec<DailyAttendanceResponse>> {
        let employees: HashMap<String, EmployeeMaster> = self
            .store
            .find_by_ids(records.iter().map(|r| r.employee_master_id.clone()))
            .await?;

        Ok(records
            .into_iter()
            .map(|r| {
                let employee = employees.get(&r.employee_master_id);
                DailyAttendanceResponse {
                    employee_name: employee.map(EmployeeMaster::full_name),
                    employee_code: employee.map(|e| e.employee_code.clone()),
                    department: employee.and_then(|e| e.department_id.clone()),
                    designation: employee.and_then(|e| e.designation_id.clone()),
                    id: r.id,
                    employee_master_id: r.employee_master_id,
                    date: r.date,
                    check_in: r.check_in,
                    check_out: r.check_out,
                    working_hours: r.working_hours,
                    status: r.status,
                    location: r.location,
                    remarks: r.remarks,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use chrono::NaiveDate;

    fn dto(employee_id: &str, day: u32) -> CreateDailyAttendance {
        CreateDailyAttendance {
            employee_master_id: employee_id.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            check_in: None,
            check_out: None,
            working_hours: None,
            status: None,
            location: None,
            remarks: None,
        }
    }

    #[actix_web::test]
    async fn status_defaults_to_absent() {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", None))
            .await
            .unwrap()
            .employee;
        let service = DailyAttendanceService::new(store);

        let created = service.create(dto(&employee.id, 3)).await.unwrap();
        assert_eq!(created.status, AttendanceStatus::Absent);
        assert_eq!(created.employee_name.as_deref(), Some("Ann Lee"));
    }

    #[actix_web::test]
    async fn unknown_employee_is_not_found() {
        let service = DailyAttendanceService::new(Store::in_memory());
        assert!(matches!(service.create(dto("ghost", 3)).await, Err(ApiError::NotFound(_))));
    }

    #[actix_web::test]
    async fn list_filters_and_orders_by_date() {
        let store = Store::in_memory();
        let employees = EmployeeService::new(store.clone());
        let ann = employees.create(new_employee("Ann", "Lee", None)).await.unwrap().employee;
        let bob = employees.create(new_employee("Bob", "Stone", None)).await.unwrap().employee;
        let service = DailyAttendanceService::new(store);

        let mut present = dto(&ann.id, 3);
        present.status = Some(AttendanceStatus::Present);
        present.remarks = Some("Client visit".into());
        service.create(present).await.unwrap();
        service.create(dto(&ann.id, 4)).await.unwrap();
        service.create(dto(&bob.id, 4)).await.unwrap();

        let all = service.list(DailyAttendanceQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());

        let present = service
            .list(DailyAttendanceQuery { status: Some("present".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(present.len(), 1);

        let on_4th = service
            .list(DailyAttendanceQuery {
                date: NaiveDate::from_ymd_opt(2025, 3, 4),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(on_4th.len(), 2);

        let by_remark = service
            .list(DailyAttendanceQuery { search: Some("client".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(by_remark.len(), 1);

        let by_name = service
            .list(DailyAttendanceQuery { search: Some("stone".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].employee_master_id, bob.id);
    }
}
