use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::leave_balance::{
    CreateLeaveBalance, LeaveBalanceQuery, LeaveBalanceResponse, UpdateLeaveBalance,
};
use crate::service::leave_balance::LeaveBalanceService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_leave_balance))
            .route(web::get().to(list_leave_balances)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_leave_balance))
            .route(web::patch().to(update_leave_balance))
            .route(web::delete().to(delete_leave_balance)),
    );
}

#[utoipa::path(
    post,
    path = "/api/leave-balances",
    request_body = CreateLeaveBalance,
    responses(
        (status = 201, description = "Leave balance created", body = LeaveBalanceResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Balance for this employee, policy and year already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Balances"
)]
pub async fn create_leave_balance(
    service: web::Data<LeaveBalanceService>,
    payload: web::Json<CreateLeaveBalance>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/leave-balances",
    params(LeaveBalanceQuery),
    responses((status = 200, description = "Leave balances, newest first", body = [LeaveBalanceResponse])),
    security(("bearer_auth" = [])),
    tag = "Leave Balances"
)]
pub async fn list_leave_balances(
    service: web::Data<LeaveBalanceService>,
    query: web::Query<LeaveBalanceQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/leave-balances/{id}",
    params(("id" = String, Path, description = "Leave balance id")),
    responses(
        (status = 200, description = "Leave balance", body = LeaveBalanceResponse),
        (status = 404, description = "Leave balance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Balances"
)]
pub async fn get_leave_balance(service: web::Data<LeaveBalanceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/leave-balances/{id}",
    params(("id" = String, Path, description = "Leave balance id")),
    request_body = UpdateLeaveBalance,
    responses(
        (status = 200, description = "Updated leave balance", body = LeaveBalanceResponse),
        (status = 404, description = "Leave balance not found"),
        (status = 409, description = "Balance for this employee, policy and year already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Balances"
)]
pub async fn update_leave_balance(
    service: web::Data<LeaveBalanceService>,
    id: web::Path<String>,
    payload: web::Json<UpdateLeaveBalance>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/leave-balances/{id}",
    params(("id" = String, Path, description = "Leave balance id")),
    responses(
        (status = 200, description = "Leave balance deleted", body = MessageResponse),
        (status = 404, description = "Leave balance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave Balances"
)]
pub async fn delete_leave_balance(service: web::Data<LeaveBalanceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Leave balance"))
}
