use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::salary_template::{
    CreateSalaryTemplate, SalaryTemplate, SalaryTemplateResponse, UpdateSalaryTemplate,
};
use crate::service::salary_template::SalaryTemplateService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_salary_template))
            .route(web::get().to(list_salary_templates)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_salary_template))
            .route(web::patch().to(update_salary_template))
            .route(web::delete().to(delete_salary_template)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_salary_template)));
}

#[utoipa::path(
    post,
    path = "/api/salary-templates",
    request_body = CreateSalaryTemplate,
    responses(
        (status = 201, description = "Salary template created", body = SalaryTemplateResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Salary template code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn create_salary_template(
    service: web::Data<SalaryTemplateService>,
    payload: web::Json<CreateSalaryTemplate>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/salary-templates",
    params(ActiveQuery),
    responses((status = 200, description = "Salary templates, newest first", body = [SalaryTemplateResponse])),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn list_salary_templates(
    service: web::Data<SalaryTemplateService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/salary-templates/{id}",
    params(("id" = String, Path, description = "Salary template id")),
    responses(
        (status = 200, description = "Salary template", body = SalaryTemplateResponse),
        (status = 404, description = "Salary template not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn get_salary_template(service: web::Data<SalaryTemplateService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/salary-templates/{id}",
    params(("id" = String, Path, description = "Salary template id")),
    request_body = UpdateSalaryTemplate,
    responses(
        (status = 200, description = "Updated salary template", body = SalaryTemplateResponse),
        (status = 404, description = "Salary template not found"),
        (status = 409, description = "Salary template code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn update_salary_template(
    service: web::Data<SalaryTemplateService>,
    id: web::Path<String>,
    payload: web::Json<UpdateSalaryTemplate>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/salary-templates/{id}",
    params(("id" = String, Path, description = "Salary template id")),
    responses(
        (status = 200, description = "Salary template deleted", body = MessageResponse),
        (status = 404, description = "Salary template not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn delete_salary_template(service: web::Data<SalaryTemplateService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Salary template"))
}

#[utoipa::path(
    patch,
    path = "/api/salary-templates/{id}/toggle-active",
    params(("id" = String, Path, description = "Salary template id")),
    responses(
        (status = 200, description = "Salary template with is_active flipped", body = SalaryTemplate),
        (status = 404, description = "Salary template not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Templates"
)]
pub async fn toggle_salary_template(service: web::Data<SalaryTemplateService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
