use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::face_recognition_log::{
    CreateFaceLog, DateRangeQuery, FaceLogQuery, FaceLogResponse, FaceLogStatistics, RecentQuery, UpdateFaceLog,
};
use crate::service::face_recognition_log::FaceLogService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_face_log))
            .route(web::get().to(list_face_logs)),
    )
    // registered before /{id} so they are not captured as ids
    .service(web::resource("/recent").route(web::get().to(recent_face_logs)))
    .service(web::resource("/statistics").route(web::get().to(face_log_statistics)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_face_log))
            .route(web::patch().to(update_face_log))
            .route(web::delete().to(delete_face_log)),
    );
}

#[utoipa::path(
    post,
    path = "/api/face-recognition-logs",
    request_body = CreateFaceLog,
    responses(
        (status = 201, description = "Face recognition log created", body = FaceLogResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn create_face_log(
    service: web::Data<FaceLogService>,
    payload: web::Json<CreateFaceLog>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/face-recognition-logs",
    params(FaceLogQuery),
    responses((status = 200, description = "Face recognition logs, newest first", body = [FaceLogResponse])),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn list_face_logs(
    service: web::Data<FaceLogService>,
    query: web::Query<FaceLogQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.into_inner()).await?))
}

#[utoipa::path(
    get,
    path = "/api/face-recognition-logs/{id}",
    params(("id" = String, Path, description = "Face recognition log id")),
    responses(
        (status = 200, description = "Face recognition log", body = FaceLogResponse),
        (status = 404, description = "Face recognition log not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn get_face_log(service: web::Data<FaceLogService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/face-recognition-logs/{id}",
    params(("id" = String, Path, description = "Face recognition log id")),
    request_body = UpdateFaceLog,
    responses(
        (status = 200, description = "Updated face recognition log", body = FaceLogResponse),
        (status = 404, description = "Face recognition log not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn update_face_log(
    service: web::Data<FaceLogService>,
    id: web::Path<String>,
    payload: web::Json<UpdateFaceLog>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/face-recognition-logs/{id}",
    params(("id" = String, Path, description = "Face recognition log id")),
    responses(
        (status = 200, description = "Face recognition log deleted", body = MessageResponse),
        (status = 404, description = "Face recognition log not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn delete_face_log(service: web::Data<FaceLogService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Face recognition log"))
}

#[utoipa::path(
    get,
    path = "/api/face-recognition-logs/recent",
    params(RecentQuery),
    responses((status = 200, description = "Latest logs, newest first", body = [FaceLogResponse])),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn recent_face_logs(
    service: web::Data<FaceLogService>,
    query: web::Query<RecentQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.recent(query.limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/face-recognition-logs/statistics",
    params(DateRangeQuery),
    responses((status = 200, description = "Counts per recognition status", body = FaceLogStatistics)),
    security(("bearer_auth" = [])),
    tag = "Face Recognition Logs"
)]
pub async fn face_log_statistics(
    service: web::Data<FaceLogService>,
    query: web::Query<DateRangeQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.statistics(query.start_date, query.end_date).await?))
}
