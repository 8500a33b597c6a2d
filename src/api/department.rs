use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::department::{CreateDepartment, Department, DepartmentResponse, UpdateDepartment};
use crate::service::department::DepartmentService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_department))
            .route(web::get().to(list_departments)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_department))
            .route(web::patch().to(update_department))
            .route(web::delete().to(delete_department)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_department)));
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Department code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn create_department(
    service: web::Data<DepartmentService>,
    payload: web::Json<CreateDepartment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    params(ActiveQuery),
    responses((status = 200, description = "Departments, newest first", body = [DepartmentResponse])),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn list_departments(
    service: web::Data<DepartmentService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn get_department(service: web::Data<DepartmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department id")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Updated department", body = DepartmentResponse),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Department code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn update_department(
    service: web::Data<DepartmentService>,
    id: web::Path<String>,
    payload: web::Json<UpdateDepartment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department deleted", body = MessageResponse),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn delete_department(service: web::Data<DepartmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Department"))
}

#[utoipa::path(
    patch,
    path = "/api/departments/{id}/toggle-active",
    params(("id" = String, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department with is_active flipped", body = Department),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn toggle_department(service: web::Data<DepartmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
