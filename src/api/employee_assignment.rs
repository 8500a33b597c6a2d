use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::employee_assignment::{
    AssignmentQuery, AssignmentResponse, CreateAssignment, UpdateAssignment,
};
use crate::service::employee_assignment::EmployeeAssignmentService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_assignment))
            .route(web::get().to(list_assignments)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_assignment))
            .route(web::patch().to(update_assignment))
            .route(web::delete().to(delete_assignment)),
    );
}

#[utoipa::path(
    post,
    path = "/api/employee-assignments",
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Employee assignment created", body = AssignmentResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Employee already has an active assignment on this project")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee Assignments"
)]
pub async fn create_assignment(
    service: web::Data<EmployeeAssignmentService>,
    payload: web::Json<CreateAssignment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/employee-assignments",
    params(AssignmentQuery),
    responses((status = 200, description = "Assignments, newest first", body = [AssignmentResponse])),
    security(("bearer_auth" = [])),
    tag = "Employee Assignments"
)]
pub async fn list_assignments(
    service: web::Data<EmployeeAssignmentService>,
    query: web::Query<AssignmentQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/employee-assignments/{id}",
    params(("id" = String, Path, description = "Employee assignment id")),
    responses(
        (status = 200, description = "Employee assignment", body = AssignmentResponse),
        (status = 404, description = "Employee assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee Assignments"
)]
pub async fn get_assignment(service: web::Data<EmployeeAssignmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/employee-assignments/{id}",
    params(("id" = String, Path, description = "Employee assignment id")),
    request_body = UpdateAssignment,
    responses(
        (status = 200, description = "Updated employee assignment", body = AssignmentResponse),
        (status = 404, description = "Employee assignment not found"),
        (status = 409, description = "Employee already has an active assignment on this project")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee Assignments"
)]
pub async fn update_assignment(
    service: web::Data<EmployeeAssignmentService>,
    id: web::Path<String>,
    payload: web::Json<UpdateAssignment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/employee-assignments/{id}",
    params(("id" = String, Path, description = "Employee assignment id")),
    responses(
        (status = 200, description = "Employee assignment deleted", body = MessageResponse),
        (status = 404, description = "Employee assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee Assignments"
)]
pub async fn delete_assignment(service: web::Data<EmployeeAssignmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Employee assignment"))
}
