use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::department::{Department, DepartmentSummary};
use crate::model::designation::{Designation, DesignationSummary};
use crate::model::location::{Location, LocationSummary};
use crate::model::shift::{CreateShift, Shift, ShiftResponse, UpdateShift};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{
    delete_record, ensure_all_exist, ensure_code_available, ensure_exists, ensure_optional, now,
    toggle_active,
};

fn minutes_since_midnight(hhmm: &str) -> i64 {
    let mut parts = hhmm.splitn(2, ':');
    let hours: i64 = parts.next().and_then(|h| h.trim().parse().ok()).unwrap_or(0);
    let minutes: i64 = parts.next().and_then(|m| m.trim().parse().ok()).unwrap_or(0);
    hours * 60 + minutes
}

/// Worked hours between two `HH:mm` times, rounded to one decimal. An end
/// before the start is taken to be on the next day. The result is not
/// clamped, so a break longer than the span yields a negative value.
pub fn calc_total_hours(start: &str, end: &str, break_minutes: u32) -> f64 {
    let start = minutes_since_midnight(start);
    let mut end = minutes_since_midnight(end);
    if end < start {
        end += 24 * 60;
    }
    let worked = (end - start - i64::from(break_minutes)) as f64 / 60.0;
    (worked * 10.0).round() / 10.0
}

fn checked_total_hours(start: &str, end: &str, break_minutes: u32) -> ApiResult<f64> {
    let total = calc_total_hours(start, end, break_minutes);
    if total < 0.0 {
        return Err(ApiError::BadRequest(
            "Break duration exceeds the shift length".into(),
        ));
    }
    Ok(total)
}

#[derive(Clone)]
pub struct ShiftService {
    store: Store,
}

impl ShiftService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn check_links(
        &self,
        location_id: Option<&str>,
        department_ids: Option<&[String]>,
        designation_ids: Option<&[String]>,
    ) -> ApiResult<()> {
        ensure_optional::<Location>(&self.store, location_id).await?;
        if let Some(ids) = department_ids {
            ensure_all_exist::<Department>(&self.store, ids).await?;
        }
        if let Some(ids) = designation_ids {
            ensure_all_exist::<Designation>(&self.store, ids).await?;
        }
        Ok(())
    }

    pub async fn create(&self, dto: CreateShift) -> ApiResult<ShiftResponse> {
        ensure_code_available::<Shift>(&self.store, "shift_code", &dto.shift_code, None).await?;
        self.check_links(
            dto.location_id.as_deref(),
            dto.department_ids.as_deref(),
            dto.designation_ids.as_deref(),
        )
        .await?;

        let break_duration = dto.break_duration.unwrap_or(0);
        let total_hours = match dto.total_hours {
            Some(hours) if hours != 0.0 => hours,
            _ => checked_total_hours(&dto.start_time, &dto.end_time, break_duration)?,
        };

        let now = now();
        let shift = Shift {
            id: new_id(),
            shift_name: dto.shift_name,
            shift_code: dto.shift_code,
            start_time: dto.start_time,
            end_time: dto.end_time,
            break_duration,
            total_hours,
            is_flexible: dto.is_flexible.unwrap_or(false),
            employee_count: dto.employee_count.unwrap_or(0),
            is_active: dto.is_active.unwrap_or(true),
            working_days: dto.working_days,
            location_id: dto.location_id.filter(|id| !id.is_empty()),
            department_ids: dto.department_ids.unwrap_or_default(),
            designation_ids: dto.designation_ids.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&shift).await?;

        info!(id = %shift.id, code = %shift.shift_code, total_hours, "Shift created");
        let mut assembled = self.assemble(vec![shift]).await?;
        assembled.pop().ok_or(ApiError::Internal)
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<ShiftResponse>> {
        let shifts = self
            .store
            .find_many(Query::new(Filter::new().eq_opt("is_active", is_active)).newest_first("created_at"))
            .await?;
        self.assemble(shifts).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<ShiftResponse> {
        let shift: Shift = ensure_exists(&self.store, id).await?;
        let mut assembled = self.assemble(vec![shift]).await?;
        assembled.pop().ok_or(ApiError::Internal)
    }

    pub async fn update(&self, id: &str, dto: UpdateShift) -> ApiResult<ShiftResponse> {
        let current: Shift = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.shift_code.as_deref().filter(|c| *c != current.shift_code) {
            ensure_code_available::<Shift>(&self.store, "shift_code", code, Some(id)).await?;
        }
        self.check_links(
            dto.location_id.as_deref(),
            dto.department_ids.as_deref(),
            dto.designation_ids.as_deref(),
        )
        .await?;

        let timing_changed =
            dto.start_time.is_some() || dto.end_time.is_some() || dto.break_duration.is_some();

        let mut updated = apply_patch(&current, &dto)?;
        if dto.location_id.as_deref() == Some("") {
            updated.location_id = None;
        }
        if timing_changed {
            updated.total_hours =
                checked_total_hours(&updated.start_time, &updated.end_time, updated.break_duration)?;
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;

        let mut assembled = self.assemble(vec![updated]).await?;
        assembled.pop().ok_or(ApiError::Internal)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<Shift>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<Shift> {
        toggle_active(&self.store, id).await
    }

    /// One batched fetch per linked table, then mapping.
    async fn assemble(&self, shifts: Vec<Shift>) -> ApiResult<Vec<ShiftResponse>> {
        let locations: HashMap<String, Location> = self
            .store
            .find_by_ids(shifts.iter().filter_map(|s| s.location_id.clone()))
            .await?;
        let departments: HashMap<String, Department> = self
            .store
            .find_by_ids(shifts.iter().flat_map(|s| s.department_ids.iter().cloned()))
            .await?;
        let designations: HashMap<String, Designation> = self
            .store
            .find_by_ids(shifts.iter().flat_map(|s| s.designation_ids.iter().cloned()))
            .await?;

        Ok(shifts
            .into_iter()
            .map(|shift| ShiftResponse {
                location: shift
                    .location_id
                    .as_ref()
                    .and_then(|id| locations.get(id))
                    .map(LocationSummary::from),
                departments: shift
                    .department_ids
                    .iter()
                    .filter_map(|id| departments.get(id))
                    .map(DepartmentSummary::from)
                    .collect(),
                designations: shift
                    .designation_ids
                    .iter()
                    .filter_map(|id| designations.get(id))
                    .map(DesignationSummary::from)
                    .collect(),
                shift,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::department::CreateDepartment;
    use crate::service::department::DepartmentService;

    fn dto(code: &str, start: &str, end: &str, break_duration: u32) -> CreateShift {
        CreateShift {
            shift_name: "Day".into(),
            shift_code: code.into(),
            start_time: start.into(),
            end_time: end.into(),
            break_duration: Some(break_duration),
            total_hours: None,
            is_flexible: None,
            employee_count: None,
            is_active: None,
            working_days: vec!["Monday".into(), "Friday".into()],
            location_id: None,
            department_ids: None,
            designation_ids: None,
        }
    }

    #[test]
    fn hours_for_a_day_shift() {
        assert_eq!(calc_total_hours("09:00", "18:00", 60), 8.0);
        assert_eq!(calc_total_hours("09:00", "17:20", 0), 8.3);
        assert_eq!(calc_total_hours("08:15", "12:45", 30), 4.0);
    }

    #[test]
    fn overnight_shift_wraps_midnight() {
        assert_eq!(calc_total_hours("22:00", "06:00", 0), 8.0);
        assert_eq!(calc_total_hours("22:00", "06:00", 30), 7.5);
    }

    #[test]
    fn calculator_does_not_clamp() {
        assert_eq!(calc_total_hours("09:00", "10:00", 120), -1.0);
        assert_eq!(calc_total_hours("09:00", "09:00", 0), 0.0);
    }

    #[actix_web::test]
    async fn create_derives_hours_unless_supplied() {
        let service = ShiftService::new(Store::in_memory());
        let derived = service.create(dto("N1", "22:00", "06:00", 30)).await.unwrap();
        assert_eq!(derived.shift.total_hours, 7.5);

        let mut explicit = dto("D1", "09:00", "18:00", 60);
        explicit.total_hours = Some(9.0);
        assert_eq!(service.create(explicit).await.unwrap().shift.total_hours, 9.0);

        let mut zero = dto("D2", "09:00", "18:00", 60);
        zero.total_hours = Some(0.0);
        assert_eq!(service.create(zero).await.unwrap().shift.total_hours, 8.0);
    }

    #[actix_web::test]
    async fn negative_total_is_rejected() {
        let service = ShiftService::new(Store::in_memory());
        let err = service.create(dto("X", "09:00", "10:00", 120)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_recomputes_with_merged_times() {
        let service = ShiftService::new(Store::in_memory());
        let created = service.create(dto("D", "09:00", "18:00", 60)).await.unwrap();

        let updated = service
            .update(
                &created.shift.id,
                UpdateShift { end_time: Some("17:00".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(updated.shift.total_hours, 7.0);
        assert_eq!(updated.shift.start_time, "09:00");

        let renamed = service
            .update(
                &created.shift.id,
                UpdateShift { shift_name: Some("Early".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(renamed.shift.total_hours, 7.0);
    }

    #[actix_web::test]
    async fn links_are_checked_and_embedded() {
        let store = Store::in_memory();
        let department = DepartmentService::new(store.clone())
            .create(CreateDepartment {
                department_name: "Operations".into(),
                department_code: "OPS".into(),
                description: None,
                location_id: None,
                employee_count: None,
                is_active: None,
            })
            .await
            .unwrap();
        let service = ShiftService::new(store);

        let mut bad = dto("A", "09:00", "18:00", 0);
        bad.department_ids = Some(vec![department.department.id.clone(), "ghost".into()]);
        assert!(matches!(service.create(bad).await, Err(ApiError::NotFound(_))));

        let mut good = dto("A", "09:00", "18:00", 0);
        good.department_ids = Some(vec![department.department.id.clone()]);
        service.create(good).await.unwrap();

        let listed = service.list(Some(true)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].departments[0].department_code, "OPS");
    }

    #[actix_web::test]
    async fn duplicate_shift_code_conflicts() {
        let service = ShiftService::new(Store::in_memory());
        service.create(dto("S", "09:00", "18:00", 0)).await.unwrap();
        let err = service.create(dto("S", "10:00", "19:00", 0)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(service.list(None).await.unwrap()[0].shift.start_time, "09:00");
    }
}
