use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::error::ApiResult;
use crate::model::project_document::{
    CreateProjectDocument, ProjectDocumentQuery, ProjectDocumentResponse, UpdateProjectDocument,
};
use crate::service::project_document::ProjectDocumentService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_project_document))
            .route(web::get().to(list_project_documents)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_project_document))
            .route(web::patch().to(update_project_document))
            .route(web::delete().to(delete_project_document)),
    );
}

#[utoipa::path(
    post,
    path = "/api/project-documents",
    request_body = CreateProjectDocument,
    responses(
        (status = 201, description = "Project document created", body = ProjectDocumentResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Documents"
)]
pub async fn create_project_document(
    service: web::Data<ProjectDocumentService>,
    payload: web::Json<CreateProjectDocument>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/project-documents",
    params(ProjectDocumentQuery),
    responses((status = 200, description = "Project documents, newest first", body = [ProjectDocumentResponse])),
    security(("bearer_auth" = [])),
    tag = "Project Documents"
)]
pub async fn list_project_documents(
    service: web::Data<ProjectDocumentService>,
    query: web::Query<ProjectDocumentQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/project-documents/{id}",
    params(("id" = String, Path, description = "Project document id")),
    responses(
        (status = 200, description = "Project document", body = ProjectDocumentResponse),
        (status = 404, description = "Project document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Documents"
)]
pub async fn get_project_document(
    service: web::Data<ProjectDocumentService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/project-documents/{id}",
    params(("id" = String, Path, description = "Project document id")),
    request_body = UpdateProjectDocument,
    responses(
        (status = 200, description = "Updated project document", body = ProjectDocumentResponse),
        (status = 404, description = "Project document or project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Documents"
)]
pub async fn update_project_document(
    service: web::Data<ProjectDocumentService>,
    id: web::Path<String>,
    payload: web::Json<UpdateProjectDocument>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

/// Answers 204 with no body.
#[utoipa::path(
    delete,
    path = "/api/project-documents/{id}",
    params(("id" = String, Path, description = "Project document id")),
    responses(
        (status = 204, description = "Project document deleted"),
        (status = 404, description = "Project document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Documents"
)]
pub async fn delete_project_document(
    service: web::Data<ProjectDocumentService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
