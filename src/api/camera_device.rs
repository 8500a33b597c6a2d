use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::api::{MessageResponse, deleted};
use crate::error::ApiResult;
use crate::model::ActiveQuery;
use crate::model::camera_device::{CameraDevice, CreateCameraDevice, UpdateCameraDevice};
use crate::service::camera_device::CameraDeviceService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create_camera_device))
            .route(web::get().to(list_camera_devices)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_camera_device))
            .route(web::patch().to(update_camera_device))
            .route(web::delete().to(delete_camera_device)),
    )
    .service(web::resource("/{id}/toggle-active").route(web::patch().to(toggle_camera_device)));
}

#[utoipa::path(
    post,
    path = "/api/camera-devices",
    request_body = CreateCameraDevice,
    responses(
        (status = 201, description = "Camera device created", body = CameraDevice),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Referenced record not found"),
        (status = 409, description = "Camera device code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn create_camera_device(
    service: web::Data<CameraDeviceService>,
    payload: web::Json<CreateCameraDevice>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let created = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/camera-devices",
    params(ActiveQuery),
    responses((status = 200, description = "Camera devices, newest first", body = [CameraDevice])),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn list_camera_devices(
    service: web::Data<CameraDeviceService>,
    query: web::Query<ActiveQuery>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list(query.is_active).await?))
}

#[utoipa::path(
    get,
    path = "/api/camera-devices/{id}",
    params(("id" = String, Path, description = "Camera device id")),
    responses(
        (status = 200, description = "Camera device", body = CameraDevice),
        (status = 404, description = "Camera device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn get_camera_device(service: web::Data<CameraDeviceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/camera-devices/{id}",
    params(("id" = String, Path, description = "Camera device id")),
    request_body = UpdateCameraDevice,
    responses(
        (status = 200, description = "Updated camera device", body = CameraDevice),
        (status = 404, description = "Camera device not found"),
        (status = 409, description = "Camera device code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn update_camera_device(
    service: web::Data<CameraDeviceService>,
    id: web::Path<String>,
    payload: web::Json<UpdateCameraDevice>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    Ok(HttpResponse::Ok().json(service.update(&id, payload.into_inner()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/camera-devices/{id}",
    params(("id" = String, Path, description = "Camera device id")),
    responses(
        (status = 200, description = "Camera device deleted", body = MessageResponse),
        (status = 404, description = "Camera device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn delete_camera_device(service: web::Data<CameraDeviceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;
    Ok(deleted("Camera device"))
}

#[utoipa::path(
    patch,
    path = "/api/camera-devices/{id}/toggle-active",
    params(("id" = String, Path, description = "Camera device id")),
    responses(
        (status = 200, description = "Camera device with is_active flipped", body = CameraDevice),
        (status = 404, description = "Camera device not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Camera Devices"
)]
pub async fn toggle_camera_device(service: web::Data<CameraDeviceService>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.toggle_active(&id).await?))
}
