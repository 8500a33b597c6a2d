use actix_web::{HttpRequest, HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::face_enrollment::{
    CreateFaceEnrollment, FaceEnrollmentQuery, FaceEnrollmentResponse, UpdateFaceEnrollment, UploadQuery,
};
use crate::service::face_enrollment::{FaceEnrollmentService, ImageUpload};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_face_enrollment))
            .route(web::get().to(list_face_enrollments)),
    )
    .service(web::resource("/employee/{employee_id}").route(web::get().to(face_enrollment_for_employee)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_face_enrollment))
            .route(web::patch().to(update_face_enrollment))
            .route(web::delete().to(delete_face_enrollment)),
    )
    .service(web::resource("/{id}/upload-image").route(web::post().to(upload_face_image)));
}

#[utoipa::path(
    post,
    path = "/api/face-enrollments",
    request_body = CreateFaceEnrollment,
    responses(
        (status = 201, description = "Face enrollment created", body = FaceEnrollmentResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Employee already has a face enrollment")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn create_face_enrollment(
    service: web::Data<FaceEnrollmentService>,
    payload: web::Json<CreateFaceEnrollment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/face-enrollments",
    params(FaceEnrollmentQuery),
    responses((status = 200, description = "Face enrollments, newest first", body = [FaceEnrollmentResponse])),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn list_face_enrollments(
    service: web::Data<FaceEnrollmentService>,
    query: web::Query<FaceEnrollmentQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/face-enrollments/{id}",
    params(("id" = String, Path, description = "Face enrollment id")),
    responses(
        (status = 200, description = "Face enrollment", body = FaceEnrollmentResponse),
        (status = 404, description = "Face enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn get_face_enrollment(service: web::Data<FaceEnrollmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/face-enrollments/{id}",
    params(("id" = String, Path, description = "Face enrollment id")),
    request_body = UpdateFaceEnrollment,
    responses(
        (status = 200, description = "Updated face enrollment", body = FaceEnrollmentResponse),
        (status = 404, description = "Face enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn update_face_enrollment(
    service: web::Data<FaceEnrollmentService>,
    id: web::Path<String>,
    payload: web::Json<UpdateFaceEnrollment>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/face-enrollments/{id}",
    params(("id" = String, Path, description = "Face enrollment id")),
    responses(
        (status = 200, description = "Face enrollment deleted", body = MessageResponse),
        (status = 404, description = "Face enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn delete_face_enrollment(service: web::Data<FaceEnrollmentService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Face enrollment"))
}

/// `null` when the employee has no enrollment yet.
#[utoipa::path(
    get,
    path = "/api/face-enrollments/employee/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee master id")),
    responses((status = 200, description = "Enrollment or null", body = FaceEnrollmentResponse)),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn face_enrollment_for_employee(
    service: web::Data<FaceEnrollmentService>,
    employee_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.find_by_employee(&employee_id).await?))
}

/// Raw image bytes as the request body; the format comes from `file_name`
/// or the Content-Type header.
#[utoipa::path(
    post,
    path = "/api/face-enrollments/{id}/upload-image",
    params(("id" = String, Path, description = "Face enrollment id"), UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "jpg, jpeg, png or webp, at most 5 MB"),
    responses(
        (status = 200, description = "Enrollment marked ENROLLED", body = FaceEnrollmentResponse),
        (status = 400, description = "Missing, oversized or unsupported image"),
        (status = 404, description = "Face enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Enrollments"
)]
pub async fn upload_face_image(
    req: HttpRequest,
    service: web::Data<FaceEnrollmentService>,
    id: web::Path<String>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let content_type = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let upload = ImageUpload { bytes: body, file_name: query.into_inner().file_name, content_type };
    Ok(HttpResponse::Ok().json(service.upload_image(&id, upload).await?))
}

/// Public, mounted at `/uploads/face-images/{file_name}`.
pub async fn face_image(
    service: web::Data<FaceEnrollmentService>,
    file_name: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (bytes, content_type) = service.image(&file_name).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
