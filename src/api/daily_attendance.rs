use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::daily_attendance::{
    CreateDailyAttendance, DailyAttendanceQuery, DailyAttendanceResponse, UpdateDailyAttendance,
};
use crate::service::daily_attendance::DailyAttendanceService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_attendance))
            .route(web::get().to(list_attendance)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_attendance))
            .route(web::patch().to(update_attendance))
            .route(web::delete().to(delete_attendance)),
    );
}

#[utoipa::path(
    post,
    path = "/api/daily-attendance",
    request_body = CreateDailyAttendance,
    responses(
        (status = 201, description = "Daily attendance created", body = DailyAttendanceResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Attendance"
)]
pub async fn create_attendance(
    service: web::Data<DailyAttendanceService>,
    payload: web::Json<CreateDailyAttendance>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/daily-attendance",
    params(DailyAttendanceQuery),
    responses((status = 200, description = "Attendance records, newest first", body = [DailyAttendanceResponse])),
    security(("bearer_auth" = [])),
    tag = "Daily Attendance"
)]
pub async fn list_attendance(
    service: web::Data<DailyAttendanceService>,
    query: web::Query<DailyAttendanceQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/daily-attendance/{id}",
    params(("id" = String, Path, description = "Daily attendance id")),
    responses(
        (status = 200, description = "Daily attendance", body = DailyAttendanceResponse),
        (status = 404, description = "Daily attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Attendance"
)]
pub async fn get_attendance(service: web::Data<DailyAttendanceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/daily-attendance/{id}",
    params(("id" = String, Path, description = "Daily attendance id")),
    request_body = UpdateDailyAttendance,
    responses(
        (status = 200, description = "Updated daily attendance", body = DailyAttendanceResponse),
        (status = 404, description = "Daily attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Attendance"
)]
pub async fn update_attendance(
    service: web::Data<DailyAttendanceService>,
    id: web::Path<String>,
    payload: web::Json<UpdateDailyAttendance>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/daily-attendance/{id}",
    params(("id" = String, Path, description = "Daily attendance id")),
    responses(
        (status = 200, description = "Daily attendance deleted", body = MessageResponse),
        (status = 404, description = "Daily attendance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Attendance"
)]
pub async fn delete_attendance(service: web::Data<DailyAttendanceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Daily attendance"))
}
