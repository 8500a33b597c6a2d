use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeMaster;
use crate::model::enum_value;
use crate::model::gps_punch::{CreateGpsPunch, GpsPunch, GpsPunchQuery, GpsPunchResponse, PunchStatus, PunchType};
use crate::model::project::Project;
use crate::store::{Filter, Query, Store, new_id};

use super::daily_attendance::employees_matching;
use super::guards::{ensure_exists, ensure_optional, now, parse_filter, unless_all};
use super::leave_application::{end_of_day, start_of_day};
use super::roster::{EmployeeCard, load_cards};

#[derive(Clone)]
pub struct GpsPunchService {
    store: Store,
}

impl GpsPunchService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateGpsPunch) -> ApiResult<GpsPunchResponse> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;
        let project_id = dto.project_id.filter(|id| !id.is_empty());
        ensure_optional::<Project>(&self.store, project_id.as_deref()).await?;

        let now = now();
        let punch = GpsPunch {
            id: new_id(),
            employee_master_id: dto.employee_master_id,
            project_id,
            punch_type: dto.punch_type,
            punch_time: dto.punch_time.unwrap_or(now),
            latitude: dto.latitude,
            longitude: dto.longitude,
            location: dto.location,
            distance: dto.distance,
            status: dto.status.unwrap_or_default(),
            accuracy: dto.accuracy,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&punch).await?;

        info!(
            id = %punch.id,
            employee_id = %punch.employee_master_id,
            punch_type = %punch.punch_type,
            status = %punch.status,
            "GPS punch recorded"
        );
        let mut responses = self.respond(vec![punch]).await?;
        responses.pop().ok_or(ApiError::Internal)
    }

    pub async fn list(&self, query: GpsPunchQuery) -> ApiResult<Vec<GpsPunchResponse>> {
        let mut filter = Filter::new().eq_opt(
            "employee_master_id",
            query.employee_master_id.filter(|v| !v.is_empty()),
        );

        if let Some(raw) = unless_all(query.punch_type.as_deref()) {
            let punch_type: PunchType = parse_filter("punch_type", raw)?;
            filter = filter.eq("punch_type", enum_value(&punch_type));
        }
        if let Some(raw) = unless_all(query.status.as_deref()) {
            let status: PunchStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        if let Some(project_id) = unless_all(query.project_id.as_deref()) {
            filter = filter.eq("project_id", project_id);
        }
        if let Some(start) = query.start_date {
            filter = filter.gte("punch_time", start_of_day(start));
        }
        if let Some(end) = query.end_date {
            filter = filter.lte("punch_time", end_of_day(end));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            filter = filter.is_in("employee_master_id", employees_matching(&self.store, term).await?);
        }

        let punches = self
            .store
            .find_many(Query::new(filter).newest_first("punch_time"))
            .await?;
        self.respond(punches).await
    }

    async fn respond(&self, punches: Vec<GpsPunch>) -> ApiResult<Vec<GpsPunchResponse>> {
        let cards = load_cards(&self.store, punches.iter().map(|p| p.employee_master_id.clone())).await?;
        let projects: HashMap<String, Project> = self
            .store
            .find_by_ids(punches.iter().filter_map(|p| p.project_id.clone()))
            .await?;

        Ok(punches
            .into_iter()
            .map(|p| {
                let card = cards.get(&p.employee_master_id).cloned().unwrap_or_else(EmployeeCard::unknown);
                let project = p.project_id.as_ref().and_then(|id| projects.get(id));
                GpsPunchResponse {
                    id: p.id,
                    employee_id: p.employee_master_id,
                    employee_code: card.code,
                    employee_name: card.name,
                    department: card.department,
                    designation: card.designation,
                    project_name: project.map(|pr| pr.name.clone()),
                    project_code: project.map(|pr| pr.code.clone()),
                    project_id: p.project_id,
                    punch_type: p.punch_type,
                    punch_time: p.punch_time,
                    latitude: p.latitude,
                    longitude: p.longitude,
                    location: p.location,
                    distance: p.distance,
                    status: p.status,
                    accuracy: p.accuracy,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};
    use crate::service::roster::NOT_ASSIGNED;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn punch(employee_id: &str, punch_type: PunchType, day: u32, hour: u32) -> CreateGpsPunch {
        CreateGpsPunch {
            employee_master_id: employee_id.into(),
            project_id: None,
            punch_type,
            punch_time: Some(Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()),
            latitude: 23.81,
            longitude: 90.41,
            location: None,
            distance: None,
            status: None,
            accuracy: None,
        }
    }

    async fn setup() -> (GpsPunchService, EmployeeMaster) {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", Some("E-7")))
            .await
            .unwrap()
            .employee;
        (GpsPunchService::new(store), employee)
    }

    #[actix_web::test]
    async fn punch_time_defaults_to_now_and_labels_fill_in() {
        let (service, employee) = setup().await;
        let mut dto = punch(&employee.id, PunchType::In, 1, 9);
        dto.punch_time = None;

        let before = now();
        let created = service.create(dto).await.unwrap();
        assert!(created.punch_time >= before);
        assert_eq!(created.status, PunchStatus::Valid);
        assert_eq!(created.employee_name, "Ann Lee");
        assert_eq!(created.employee_code, "E-7");
        assert_eq!(created.department, NOT_ASSIGNED);
        assert_eq!(created.project_name, None);
    }

    #[actix_web::test]
    async fn unknown_project_is_not_found() {
        let (service, employee) = setup().await;
        let mut dto = punch(&employee.id, PunchType::In, 1, 9);
        dto.project_id = Some("ghost".into());
        assert!(matches!(service.create(dto).await, Err(ApiError::NotFound(_))));
    }

    #[actix_web::test]
    async fn end_date_includes_the_whole_day() {
        let (service, employee) = setup().await;
        service.create(punch(&employee.id, PunchType::In, 1, 9)).await.unwrap();
        service.create(punch(&employee.id, PunchType::Out, 2, 23)).await.unwrap();
        service.create(punch(&employee.id, PunchType::In, 3, 9)).await.unwrap();

        let found = service
            .list(GpsPunchQuery {
                start_date: NaiveDate::from_ymd_opt(2025, 6, 2),
                end_date: NaiveDate::from_ymd_opt(2025, 6, 2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].punch_type, PunchType::Out);
    }

    #[actix_web::test]
    async fn all_is_ignored_and_newest_comes_first() {
        let (service, employee) = setup().await;
        service.create(punch(&employee.id, PunchType::In, 1, 9)).await.unwrap();
        service.create(punch(&employee.id, PunchType::Out, 1, 18)).await.unwrap();

        let all = service
            .list(GpsPunchQuery {
                punch_type: Some("all".into()),
                status: Some("all".into()),
                project_id: Some("all".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].punch_type, PunchType::Out);

        let ins = service
            .list(GpsPunchQuery { punch_type: Some("in".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(ins.len(), 1);

        let nobody = service
            .list(GpsPunchQuery { search: Some("zed".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(nobody.is_empty());
    }
}
