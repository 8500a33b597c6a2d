use tracing::info;

use crate::error::ApiResult;
use crate::model::project::Project;
use crate::model::project_category::{
    CreateProjectCategory, ProjectCategory, ProjectCategoryResponse, UpdateProjectCategory,
};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_code_available, ensure_exists, now, toggle_active};

#[derive(Clone)]
pub struct ProjectCategoryService {
    store: Store,
}

impl ProjectCategoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateProjectCategory) -> ApiResult<ProjectCategoryResponse> {
        ensure_code_available::<ProjectCategory>(&self.store, "category_code", &dto.category_code, None)
            .await?;

        let now = now();
        let category = ProjectCategory {
            id: new_id(),
            category_name: dto.category_name,
            category_code: dto.category_code,
            description: dto.description,
            color: dto.color,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&category).await?;

        info!(id = %category.id, code = %category.category_code, "Project category created");
        Ok(ProjectCategoryResponse { category, project_count: 0 })
    }

    pub async fn list(&self, is_active: Option<bool>) -> ApiResult<Vec<ProjectCategoryResponse>> {
        let categories: Vec<ProjectCategory> = self
            .store
            .find_many(Query::new(Filter::new().eq_opt("is_active", is_active)).newest_first("created_at"))
            .await?;

        let ids: Vec<String> = categories.iter().map(|c| c.id.clone()).collect();
        let projects: Vec<Project> = self
            .store
            .find_many(Query::new(Filter::new().is_in("category_id", ids)))
            .await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let project_count = projects
                    .iter()
                    .filter(|p| p.category_id.as_deref() == Some(category.id.as_str()))
                    .count() as u64;
                ProjectCategoryResponse { category, project_count }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> ApiResult<ProjectCategoryResponse> {
        let category: ProjectCategory = ensure_exists(&self.store, id).await?;
        self.respond(category).await
    }

    pub async fn update(&self, id: &str, dto: UpdateProjectCategory) -> ApiResult<ProjectCategoryResponse> {
        let current: ProjectCategory = ensure_exists(&self.store, id).await?;
        if let Some(code) = dto.category_code.as_deref().filter(|c| *c != current.category_code) {
            ensure_code_available::<ProjectCategory>(&self.store, "category_code", code, Some(id)).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<ProjectCategory>(&self.store, id).await
    }

    pub async fn toggle_active(&self, id: &str) -> ApiResult<ProjectCategory> {
        toggle_active(&self.store, id).await
    }

    async fn respond(&self, category: ProjectCategory) -> ApiResult<ProjectCategoryResponse> {
        let project_count = self
            .store
            .count::<Project>(Filter::new().eq("category_id", category.id.as_str()))
            .await?;
        Ok(ProjectCategoryResponse { category, project_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::CreateProject;
    use crate::service::project::ProjectService;

    fn dto(code: &str) -> CreateProjectCategory {
        CreateProjectCategory {
            category_name: "Construction".into(),
            category_code: code.into(),
            description: "Civil works".into(),
            color: None,
            is_active: None,
        }
    }

    fn project(code: &str, category_id: &str) -> CreateProject {
        CreateProject {
            name: format!("Project {}", code),
            code: code.into(),
            description: None,
            category_id: Some(category_id.into()),
            status: None,
            start_date: None,
            end_date: None,
        }
    }

    #[actix_web::test]
    async fn project_count_is_live() {
        let store = Store::in_memory();
        let service = ProjectCategoryService::new(store.clone());
        let projects = ProjectService::new(store);

        let civil = service.create(dto("CIV")).await.unwrap().category;
        let other = service.create(dto("OTH")).await.unwrap().category;
        projects.create(project("P1", &civil.id)).await.unwrap();
        projects.create(project("P2", &civil.id)).await.unwrap();

        assert_eq!(service.get(&civil.id).await.unwrap().project_count, 2);
        let listed = service.list(None).await.unwrap();
        let count_for = |id: &str| listed.iter().find(|c| c.category.id == id).map(|c| c.project_count);
        assert_eq!(count_for(&civil.id), Some(2));
        assert_eq!(count_for(&other.id), Some(0));
    }
}
