use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::leave_policy::{CreateLeavePolicy, LeavePolicy, UpdateLeavePolicy};
use crate::service::leave_policy::LeavePolicyService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_leave_policy))
            .route(web::get().to(list_leave_policies)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_leave_policy))
            .route(web::patch().to(update_leave_policy))
            .route(web::delete().to(delete_leave_policy)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_leave_policy)));
}

#[utoipa::path(
    post,
    path = "/api/leave-policies",
    request_body = CreateLeavePolicy,
    responses(
        (status = 201, description = "Leave policy created", body = LeavePolicy),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Leave policy code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn create_leave_policy(
    service: web::Data<LeavePolicyService>,
    payload: web::Json<CreateLeavePolicy>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/leave-policies",
    params(ActiveQuery),
    responses((status = 200, description = "Leave policies, newest first", body = [LeavePolicy])),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn list_leave_policies(
    service: web::Data<LeavePolicyService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/leave-policies/{id}",
    params(("id" = String, Path, description = "Leave policy id")),
    responses(
        (status = 200, description = "Leave policy", body = LeavePolicy),
        (status = 404, description = "Leave policy not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn get_leave_policy(service: web::Data<LeavePolicyService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/leave-policies/{id}",
    params(("id" = String, Path, description = "Leave policy id")),
    request_body = UpdateLeavePolicy,
    responses(
        (status = 200, description = "Updated leave policy", body = LeavePolicy),
        (status = 404, description = "Leave policy not found"),
        (status = 409, description = "Leave policy code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn update_leave_policy(
    service: web::Data<LeavePolicyService>,
    id: web::Path<String>,
    payload: web::Json<UpdateLeavePolicy>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/leave-policies/{id}",
    params(("id" = String, Path, description = "Leave policy id")),
    responses(
        (status = 200, description = "Leave policy deleted", body = MessageResponse),
        (status = 404, description = "Leave policy not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn delete_leave_policy(service: web::Data<LeavePolicyService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Leave policy"))
}

#[utoipa::path(
    patch,
    path = "/api/leave-policies/{id}/toggle-active",
    params(("id" = String, Path, description = "Leave policy id")),
    responses(
        (status = 200, description = "Leave policy with is_active flipped", body = LeavePolicy),
        (status = 404, description = "Leave policy not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Policies"
)]
pub async fn toggle_leave_policy(service: web::Data<LeavePolicyService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
