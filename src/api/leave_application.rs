use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::auth::auth::AuthUser;
use crate::error::ApiResult;
use crate::model::leave_application::{
    ApproveLeave, CreateLeaveApplication, LeaveApplicationQuery, LeaveApplicationResponse, LeaveStatus, RejectLeave,
    UpdateLeaveApplication,
};
use crate::service::leave_application::LeaveApplicationService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_leave_application))
            .route(web::get().to(list_leave_applications)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_leave_application))
            .route(web::patch().to(update_leave_application))
            .route(web::delete().to(delete_leave_application)),
    )
    .service(web::resource("/{id}/approve").route(web::post().to(approve_leave_application)))
    .service(web::resource("/{id}/reject").route(web::post().to(reject_leave_application)));
}

#[utoipa::path(
    post,
    path = "/api/leave-applications",
    request_body = CreateLeaveApplication,
    responses(
        (status = 201, description = "Leave application created", body = LeaveApplicationResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Application number already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn create_leave_application(
    service: web::Data<LeaveApplicationService>,
    payload: web::Json<CreateLeaveApplication>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/leave-applications",
    params(LeaveApplicationQuery),
    responses((status = 200, description = "Leave applications, newest first", body = [LeaveApplicationResponse])),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn list_leave_applications(
    service: web::Data<LeaveApplicationService>,
    query: web::Query<LeaveApplicationQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/leave-applications/{id}",
    params(("id" = String, Path, description = "Leave application id")),
    responses(
        (status = 200, description = "Leave application", body = LeaveApplicationResponse),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn get_leave_application(service: web::Data<LeaveApplicationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/leave-applications/{id}",
    params(("id" = String, Path, description = "Leave application id")),
    request_body = UpdateLeaveApplication,
    responses(
        (status = 200, description = "Updated leave application", body = LeaveApplicationResponse),
        (status = 403, description = "Only HR/Admin may set APPROVED or REJECTED"),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn update_leave_application(
    auth: AuthUser,
    service: web::Data<LeaveApplicationService>,
    id: web::Path<String>,
    payload: web::Json<UpdateLeaveApplication>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    if payload.status.is_some_and(LeaveStatus::is_decision) {
        auth.require_hr_or_admin()?;
    }
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner(), &auth.user_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/leave-applications/{id}",
    params(("id" = String, Path, description = "Leave application id")),
    responses(
        (status = 200, description = "Leave application deleted", body = MessageResponse),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn delete_leave_application(service: web::Data<LeaveApplicationService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Leave application"))
}

/// HR or Admin only; the caller is recorded as approver.
#[utoipa::path(
    post,
    path = "/api/leave-applications/{id}/approve",
    params(("id" = String, Path, description = "Leave application id")),
    request_body = ApproveLeave,
    responses(
        (status = 200, description = "Approved application", body = LeaveApplicationResponse),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn approve_leave_application(
    auth: AuthUser,
    service: web::Data<LeaveApplicationService>,
    id: web::Path<String>,
    payload: Option<web::Json<ApproveLeave>>,
) -> ApiResult<HttpResponse> {
    auth.require_hr_or_admin()?;
    if let Some(comments) = payload.and_then(|p| p.into_inner().comments) {
        tracing::debug!(id = %id, comments = %comments, "Approval comments");
    }
    Ok(HttpResponse::Ok().json(service.approve(&id, &auth.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/leave-applications/{id}/reject",
    params(("id" = String, Path, description = "Leave application id")),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Rejected application", body = LeaveApplicationResponse),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Applications"
)]
pub async fn reject_leave_application(
    auth: AuthUser,
    service: web::Data<LeaveApplicationService>,
    id: web::Path<String>,
    payload: Option<web::Json<RejectLeave>>,
) -> ApiResult<HttpResponse> {
    auth.require_hr_or_admin()?;
    let reason = payload.and_then(|p| p.into_inner().rejection_reason);
    Ok(HttpResponse::Ok().json(service.reject(&id, &auth.user_id, reason).await?))
}
