use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::attendance_regularization::{
    AttendanceRegularization, CreateRegularization, RegularizationQuery, ReviewRegularization,
    UpdateRegularization,
};
use crate::service::attendance_regularization::RegularizationService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_regularization))
            .route(web::get().to(list_regularizations)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_regularization))
            .route(web::patch().to(update_regularization))
            .route(web::delete().to(delete_regularization)),
    )
    .service(web::resource("/{id}/approve").route(web::post().to(approve_regularization)))
    .service(web::resource("/{id}/reject").route(web::post().to(reject_regularization)));
}

#[utoipa::path(
    post,
    path = "/api/attendance-regularizations",
    request_body = CreateRegularization,
    responses(
        (status = 201, description = "Attendance regularization created", body = AttendanceRegularization),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn create_regularization(
    service: web::Data<RegularizationService>,
    payload: web::Json<CreateRegularization>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/attendance-regularizations",
    params(RegularizationQuery),
    responses((status = 200, description = "Regularization requests, newest first", body = [AttendanceRegularization])),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn list_regularizations(
    service: web::Data<RegularizationService>,
    query: web::Query<RegularizationQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/attendance-regularizations/{id}",
    params(("id" = String, Path, description = "Attendance regularization id")),
    responses(
        (status = 200, description = "Attendance regularization", body = AttendanceRegularization),
        (status = 404, description = "Attendance regularization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn get_regularization(service: web::Data<RegularizationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/attendance-regularizations/{id}",
    params(("id" = String, Path, description = "Attendance regularization id")),
    request_body = UpdateRegularization,
    responses(
        (status = 200, description = "Updated attendance regularization", body = AttendanceRegularization),
        (status = 404, description = "Attendance regularization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn update_regularization(
    service: web::Data<RegularizationService>,
    id: web::Path<String>,
    payload: web::Json<UpdateRegularization>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/attendance-regularizations/{id}",
    params(("id" = String, Path, description = "Attendance regularization id")),
    responses(
        (status = 200, description = "Attendance regularization deleted", body = MessageResponse),
        (status = 404, description = "Attendance regularization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn delete_regularization(service: web::Data<RegularizationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Attendance regularization"))
}

#[utoipa::path(
    post,
    path = "/api/attendance-regularizations/{id}/approve",
    params(("id" = String, Path, description = "Regularization id")),
    request_body = ReviewRegularization,
    responses(
        (status = 200, description = "Approved request", body = AttendanceRegularization),
        (status = 400, description = "Request was already reviewed"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Attendance regularization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn approve_regularization(
    auth: AuthUser,
    service: web::Data<RegularizationService>,
    id: web::Path<String>,
    payload: Option<web::Json<ReviewRegularization>>,
) -> ApiResult<HttpResponse> {
    auth.require_hr_or_admin()?;
    let remarks = payload.and_then(|p| p.into_inner().review_remarks);
    Ok(HttpResponse::Ok().json(service.approve(&id, &auth.user_id, remarks).await?))
}

#[utoipa::path(
    post,
    path = "/api/attendance-regularizations/{id}/reject",
    params(("id" = String, Path, description = "Regularization id")),
    request_body = ReviewRegularization,
    responses(
        (status = 200, description = "Rejected request", body = AttendanceRegularization),
        (status = 400, description = "Request was already reviewed"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Attendance regularization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance Regularizations"
)]
pub async fn reject_regularization(
    auth: AuthUser,
    service: web::Data<RegularizationService>,
    id: web::Path<String>,
    payload: Option<web::Json<ReviewRegularization>>,
) -> ApiResult<HttpResponse> {
    auth.require_hr_or_admin()?;
    let remarks = payload.and_then(|p| p.into_inner().review_remarks);
    Ok(HttpResponse::Ok().json(service.reject(&id, &auth.user_id, remarks).await?))
}
