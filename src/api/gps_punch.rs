use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::error::ApiResult;
use crate::model::gps_punch::{CreateGpsPunch, GpsPunchQuery, GpsPunchResponse};
use crate::service::gps_punch::GpsPunchService;

/// Punches are append-only: create and list.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_gps_punch))
            .route(web::get().to(list_gps_punches)),
    );
}

#[utoipa::path(
    post,
    path = "/api/gps-punches",
    request_body = CreateGpsPunch,
    responses(
        (status = 201, description = "Punch recorded", body = GpsPunchResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee or project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "GPS Punches"
)]
pub async fn create_gps_punch(
    service: web::Data<GpsPunchService>,
    payload: web::Json<CreateGpsPunch>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let punch = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(punch))
}

#[utoipa::path(
    get,
    path = "/api/gps-punches",
    params(GpsPunchQuery),
    responses(
        (status = 200, description = "Punches, latest first", body = [GpsPunchResponse]),
        (status = 400, description = "Unknown punch type or status")
    ),
    security(("bearer_auth" = [])),
    tag = "GPS Punches"
)]
pub async fn list_gps_punches(
    service: web::Data<GpsPunchService>,
    query: web::Query<GpsPunchQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}
