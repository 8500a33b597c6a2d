use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::enum_value;
use crate::model::project::{CreateProject, Project, ProjectQuery, ProjectStatus, UpdateProject};
use crate::model::project_category::ProjectCategory;
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, ensure_optional, now, parse_filter};

fn check_dates(project: &Project) -> ApiResult<()> {
    match (project.start_date, project.end_date) {
        (Some(start), Some(end)) if start > end => {
            Err(ApiError::BadRequest("Start date cannot be after end date".into()))
        }
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct ProjectService {
    store: Store,
}

impl ProjectService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateProject) -> ApiResult<Project> {
        ensure_code_available::<Project>(&self.store, "code", &dto.code, None).await?;
        ensure_optional::<ProjectCategory>(&self.store, dto.category_id.as_deref()).await?;

        let now = now();
        let project = Project {
            id: new_id(),
            name: dto.name,
            code: dto.code,
            description: dto.description,
            category_id: dto.category_id.filter(|v| !v.is_empty()),
            status: dto.status.unwrap_or_default(),
            start_date: dto.start_date,
            end_date: dto.end_date,
            created_at: now,
            updated_at: now,
        };
        check_dates(&project)?;
        self.store.create(&project).await?;

        info!(id = %project.id, code = %project.code, "Project created");
        Ok(project)
    }

    pub async fn list(&self, query: ProjectQuery) -> ApiResult<Vec<Project>> {
        let mut filter = Filter::new().eq_opt("category_id", query.category_id.filter(|v| !v.is_empty()));
        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: ProjectStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        Ok(self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Project> {
        ensure_exists(&self.store, id).await
    }

    pub async fn update(&self, id: &str, dto: UpdateProject) -> ApiResult<Project> {
        let current: Project = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.code.as_deref().filter(|c| *c != current.code) {
            ensure_code_available::<Project>(&self.store, "code", code, Some(id)).await?;
        }
        ensure_optional::<ProjectCategory>(&self.store, dto.category_id.as_deref()).await?;

        let mut updated = apply_patch(&current, &dto)?;
        if dto.category_id.as_deref() == Some("") {
            updated.category_id = None;
        }
        check_dates(&updated)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<Project>(&self.store, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dto(code: &str) -> CreateProject {
        CreateProject {
            name: "Bridge".into(),
            code: code.into(),
            description: None,
            category_id: None,
            status: None,
            start_date: None,
            end_date: None,
        }
    }

    #[actix_web::test]
    async fn unknown_category_is_not_found() {
        let service = ProjectService::new(Store::in_memory());
        let mut bad = dto("P1");
        bad.category_id = Some("ghost".into());
        assert!(matches!(service.create(bad).await, Err(ApiError::NotFound(_))));
    }

    #[actix_web::test]
    async fn inverted_dates_are_rejected() {
        let service = ProjectService::new(Store::in_memory());
        let mut bad = dto("P1");
        bad.start_date = NaiveDate::from_ymd_opt(2025, 5, 2);
        bad.end_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        assert!(matches!(service.create(bad).await, Err(ApiError::BadRequest(_))));
    }

    #[actix_web::test]
    async fn status_filter_is_case_insensitive() {
        let service = ProjectService::new(Store::in_memory());
        let p = service.create(dto("P1")).await.unwrap();
        service.create(dto("P2")).await.unwrap();
        service
            .update(&p.id, UpdateProject { status: Some(ProjectStatus::OnHold), ..Default::default() })
            .await
            .unwrap();

        let on_hold = service
            .list(ProjectQuery { status: Some("on_hold".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(on_hold.len(), 1);
        assert_eq!(on_hold[0].id, p.id);
    }
}
