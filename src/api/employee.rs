use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::employee::{CreateEmployee, EmployeeQuery, EmployeeResponse, UpdateEmployee};
use crate::model::staff_profile::StaffProfile;
use crate::service::employee::EmployeeService;
use crate::service::staff_profile::StaffProfileService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_employee))
            .route(web::get().to(list_employees)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_employee))
            .route(web::patch().to(update_employee))
            .route(web::delete().to(delete_employee)),
    )
    .service(web::resource("/{id}/staff-profile").route(web::post().to(ensure_staff_profile)));
}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Employee code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: web::Json<CreateEmployee>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses((status = 200, description = "Employees, newest first", body = [EmployeeResponse])),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    service: web::Data<EmployeeService>,
    query: web::Query<EmployeeQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(service: web::Data<EmployeeService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    service: web::Data<EmployeeService>,
    id: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted", body = MessageResponse),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn delete_employee(service: web::Data<EmployeeService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Employee"))
}

/// Returns the employee's staff profile, creating it from the master record
/// when none matches its code yet.
#[utoipa::path(
    post,
    path = "/api/employees/{id}/staff-profile",
    params(("id" = String, Path, description = "Employee master id")),
    responses(
        (status = 200, description = "Existing or newly projected staff profile", body = StaffProfile),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn ensure_staff_profile(
    service: web::Data<StaffProfileService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.ensure_for_master_id(&id).await?))
}
