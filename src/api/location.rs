use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::location::{CreateLocation, Location, UpdateLocation};
use crate::service::location::LocationService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_location))
            .route(web::get().to(list_locations)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_location))
            .route(web::patch().to(update_location))
            .route(web::delete().to(delete_location)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_location)));
}

#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Branch code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn create_location(
    service: web::Data<LocationService>,
    payload: web::Json<CreateLocation>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let location = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(location))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    params(ActiveQuery),
    responses((status = 200, description = "Locations, newest first", body = [Location])),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn list_locations(
    service: web::Data<LocationService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location", body = Location),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn get_location(service: web::Data<LocationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    request_body = UpdateLocation,
    responses(
        (status = 200, description = "Updated location", body = Location),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Branch code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn update_location(
    service: web::Data<LocationService>,
    id: web::Path<String>,
    payload: web::Json<UpdateLocation>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location deleted", body = MessageResponse),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn delete_location(service: web::Data<LocationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Location"))
}

#[utoipa::path(
    patch,
    path = "/api/locations/{id}/toggle-active",
    params(("id" = String, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location with is_active flipped", body = Location),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn toggle_location(service: web::Data<LocationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
