use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::designation::{CreateDesignation, Designation, DesignationQuery, UpdateDesignation};
use crate::service::designation::DesignationService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_designation))
            .route(web::get().to(list_designations)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_designation))
            .route(web::patch().to(update_designation))
            .route(web::delete().to(delete_designation)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_designation)));
}

#[utoipa::path(
    post,
    path = "/api/designations",
    request_body = CreateDesignation,
    responses(
        (status = 201, description = "Designation created", body = Designation),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Designation code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn create_designation(
    service: web::Data<DesignationService>,
    payload: web::Json<CreateDesignation>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/designations",
    params(DesignationQuery),
    responses((status = 200, description = "Designations, newest first", body = [Designation])),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn list_designations(
    service: web::Data<DesignationService>,
    query: web::Query<DesignationQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active, query.into_inner().department).await?))
}

#[utoipa::path(
    get,
    path = "/api/designations/{id}",
    params(("id" = String, Path, description = "Designation id")),
    responses(
        (status = 200, description = "Designation", body = Designation),
        (status = 404, description = "Designation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn get_designation(service: web::Data<DesignationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/designations/{id}",
    params(("id" = String, Path, description = "Designation id")),
    request_body = UpdateDesignation,
    responses(
        (status = 200, description = "Updated designation", body = Designation),
        (status = 404, description = "Designation not found"),
        (status = 409, description = "Designation code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn update_designation(
    service: web::Data<DesignationService>,
    id: web::Path<String>,
    payload: web::Json<UpdateDesignation>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/designations/{id}",
    params(("id" = String, Path, description = "Designation id")),
    responses(
        (status = 200, description = "Designation deleted", body = MessageResponse),
        (status = 404, description = "Designation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn delete_designation(service: web::Data<DesignationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Designation"))
}

#[utoipa::path(
    patch,
    path = "/api/designations/{id}/toggle-active",
    params(("id" = String, Path, description = "Designation id")),
    responses(
        (status = 200, description = "Designation with is_active flipped", body = Designation),
        (status = 404, description = "Designation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Designations"
)]
pub async fn toggle_designation(service: web::Data<DesignationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
