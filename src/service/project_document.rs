use std::collections::HashMap;

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::model::project::Project;
use crate::model::project_document::{
    CreateProjectDocument, ProjectDocument, ProjectDocumentQuery, ProjectDocumentResponse, UpdateProjectDocument,
};
use crate::store::{Filter, Query, Store, new_id};
use crate::utils::apply_patch;

use super::guards::{delete_record, ensure_exists, now};

#[derive(Clone)]
pub struct ProjectDocumentService {
    store: Store,
}

impl ProjectDocumentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreateProjectDocument) -> ApiResult<ProjectDocumentResponse> {
        ensure_exists::<Project>(&self.store, &dto.project_id).await?;

        let now = now();
        let document = ProjectDocument {
            id: new_id(),
            project_id: dto.project_id,
            document_name: dto.document_name,
            category: dto.category.filter(|c| !c.is_empty()),
            description: dto.description,
            file_url: dto.file_url,
            file_type: dto.file_type,
            file_size: dto.file_size,
            uploaded_by: dto.uploaded_by,
            is_active: dto.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&document).await?;

        info!(id = %document.id, project_id = %document.project_id, "Project document created");
        self.respond_one(document).await
    }

    pub async fn list(&self, query: ProjectDocumentQuery) -> ApiResult<Vec<ProjectDocumentResponse>> {
        let filter = Filter::new()
            .eq_opt("project_id", query.project_id.filter(|v| !v.is_empty()))
            .eq_opt("category", query.category.filter(|v| !v.is_empty()))
            .eq_opt("is_active", query.is_active);
        let documents = self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?;
        self.respond(documents).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<ProjectDocumentResponse> {
        let document: ProjectDocument = ensure_exists(&self.store, id).await?;
        self.respond_one(document).await
    }

    pub async fn update(&self, id: &str, dto: UpdateProjectDocument) -> ApiResult<ProjectDocumentResponse> {
        let current: ProjectDocument = ensure_exists(&self.store, id).await?;
        if let Some(project_id) = dto.project_id.as_deref() {
            ensure_exists::<Project>(&self.store, project_id).await?;
        }

        let mut updated = apply_patch(&current, &dto)?;
        if dto.category.as_deref() == Some("") {
            updated.category = None;
        }
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<ProjectDocument>(&self.store, id).await
    }

    async fn respond_one(&self, document: ProjectDocument) -> ApiResult<ProjectDocumentResponse> {
        self.respond(vec![document]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, documents: Vec<ProjectDocument>) -> ApiResult<Vec<ProjectDocumentResponse>> {
        let projects: HashMap<String, Project> = self
            .store
            .find_by_ids(documents.iter().map(|d| d.project_id.clone()))
            .await?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let project = projects.get(&document.project_id);
                ProjectDocumentResponse {
                    project_name: project.map(|p| p.name.clone()),
                    project_code: project.map(|p| p.code.clone()),
                    document,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::CreateProject;
    use crate::service::project::ProjectService;

    async fn project(store: &Store, code: &str) -> String {
        ProjectService::new(store.clone())
            .create(CreateProject {
                name: format!("Project {}", code),
                code: code.into(),
                description: None,
                category_id: None,
                status: None,
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap()
            .id
    }

    fn dto(project_id: &str, name: &str, category: Option<&str>) -> CreateProjectDocument {
        CreateProjectDocument {
            project_id: project_id.into(),
            document_name: name.into(),
            category: category.map(Into::into),
            description: None,
            file_url: Some("https://files.example.com/a.pdf".into()),
            file_type: Some("application/pdf".into()),
            file_size: Some(2048),
            uploaded_by: None,
            is_active: None,
        }
    }

    #[actix_web::test]
    async fn project_must_exist() {
        let service = ProjectDocumentService::new(Store::in_memory());
        let err = service.create(dto("ghost", "Plan", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_web::test]
    async fn create_joins_the_project() {
        let store = Store::in_memory();
        let project_id = project(&store, "P1").await;
        let service = ProjectDocumentService::new(store);

        let created = service.create(dto(&project_id, "Plan", Some("DRAWING"))).await.unwrap();
        assert!(created.document.is_active);
        assert_eq!(created.project_code.as_deref(), Some("P1"));
        assert_eq!(created.project_name.as_deref(), Some("Project P1"));
    }

    #[actix_web::test]
    async fn list_filters_by_project_category_and_active() {
        let store = Store::in_memory();
        let p1 = project(&store, "P1").await;
        let p2 = project(&store, "P2").await;
        let service = ProjectDocumentService::new(store);

        let plan = service.create(dto(&p1, "Plan", Some("DRAWING"))).await.unwrap();
        service.create(dto(&p1, "Contract", Some("LEGAL"))).await.unwrap();
        service.create(dto(&p2, "Permit", Some("LEGAL"))).await.unwrap();
        service
            .update(&plan.document.id, UpdateProjectDocument { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();

        let for_p1 = service
            .list(ProjectDocumentQuery { project_id: Some(p1.clone()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(for_p1.len(), 2);

        let legal = service
            .list(ProjectDocumentQuery { category: Some("LEGAL".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(legal.len(), 2);

        let inactive = service
            .list(ProjectDocumentQuery { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].document.document_name, "Plan");
    }

    #[actix_web::test]
    async fn update_checks_the_new_project_and_delete_removes() {
        let store = Store::in_memory();
        let p1 = project(&store, "P1").await;
        let service = ProjectDocumentService::new(store);
        let doc = service.create(dto(&p1, "Plan", Some("DRAWING"))).await.unwrap();
        let id = doc.document.id;

        let err = service
            .update(&id, UpdateProjectDocument { project_id: Some("ghost".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let cleared = service
            .update(&id, UpdateProjectDocument { category: Some(String::new()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(cleared.document.category, None);

        service.delete(&id).await.unwrap();
        assert!(matches!(service.get(&id).await, Err(ApiError::NotFound(_))));
    }
}
