use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::project_category::{
    CreateProjectCategory, ProjectCategory, ProjectCategoryResponse, UpdateProjectCategory,
};
use crate::service::project_category::ProjectCategoryService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_project_category))
            .route(web::get().to(list_project_categories)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_project_category))
            .route(web::patch().to(update_project_category))
            .route(web::delete().to(delete_project_category)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_project_category)));
}

#[utoipa::path(
    post,
    path = "/api/project-categories",
    request_body = CreateProjectCategory,
    responses(
        (status = 201, description = "Project category created", body = ProjectCategoryResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Project category code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn create_project_category(
    service: web::Data<ProjectCategoryService>,
    payload: web::Json<CreateProjectCategory>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/project-categories",
    params(ActiveQuery),
    responses((status = 200, description = "Project categories, newest first", body = [ProjectCategoryResponse])),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn list_project_categories(
    service: web::Data<ProjectCategoryService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/project-categories/{id}",
    params(("id" = String, Path, description = "Project category id")),
    responses(
        (status = 200, description = "Project category", body = ProjectCategoryResponse),
        (status = 404, description = "Project category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn get_project_category(service: web::Data<ProjectCategoryService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/project-categories/{id}",
    params(("id" = String, Path, description = "Project category id")),
    request_body = UpdateProjectCategory,
    responses(
        (status = 200, description = "Updated project category", body = ProjectCategoryResponse),
        (status = 404, description = "Project category not found"),
        (status = 409, description = "Project category code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn update_project_category(
    service: web::Data<ProjectCategoryService>,
    id: web::Path<String>,
    payload: web::Json<UpdateProjectCategory>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/project-categories/{id}",
    params(("id" = String, Path, description = "Project category id")),
    responses(
        (status = 200, description = "Project category deleted", body = MessageResponse),
        (status = 404, description = "Project category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn delete_project_category(service: web::Data<ProjectCategoryService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Project category"))
}

#[utoipa::path(
    patch,
    path = "/api/project-categories/{id}/toggle-active",
    params(("id" = String, Path, description = "Project category id")),
    responses(
        (status = 200, description = "Project category with is_active flipped", body = ProjectCategory),
        (status = 404, description = "Project category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Project Categories"
)]
pub async fn toggle_project_category(service: web::Data<ProjectCategoryService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
