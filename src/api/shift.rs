use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::shift::{CreateShift, Shift, ShiftResponse, UpdateShift};
use crate::service::shift::ShiftService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_shift))
            .route(web::get().to(list_shifts)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_shift))
            .route(web::patch().to(update_shift))
            .route(web::delete().to(delete_shift)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_shift)));
}

#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = CreateShift,
    responses(
        (status = 201, description = "Shift created", body = ShiftResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Shift code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn create_shift(
    service: web::Data<ShiftService>,
    payload: web::Json<CreateShift>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/shifts",
    params(ActiveQuery),
    responses((status = 200, description = "Shifts, newest first", body = [ShiftResponse])),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn list_shifts(
    service: web::Data<ShiftService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    params(("id" = String, Path, description = "Shift id")),
    responses(
        (status = 200, description = "Shift", body = ShiftResponse),
        (status = 404, description = "Shift not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn get_shift(service: web::Data<ShiftService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/shifts/{id}",
    params(("id" = String, Path, description = "Shift id")),
    request_body = UpdateShift,
    responses(
        (status = 200, description = "Updated shift", body = ShiftResponse),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "Shift code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn update_shift(
    service: web::Data<ShiftService>,
    id: web::Path<String>,
    payload: web::Json<UpdateShift>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    params(("id" = String, Path, description = "Shift id")),
    responses(
        (status = 200, description = "Shift deleted", body = MessageResponse),
        (status = 404, description = "Shift not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn delete_shift(service: web::Data<ShiftService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Shift"))
}

#[utoipa::path(
    patch,
    path = "/api/shifts/{id}/toggle-active",
    params(("id" = String, Path, description = "Shift id")),
    responses(
        (status = 200, description = "Shift with is_active flipped", body = Shift),
        (status = 404, description = "Shift not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn toggle_shift(service: web::Data<ShiftService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
