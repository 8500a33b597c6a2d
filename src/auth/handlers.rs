use actix_web::{HttpRequest, HttpResponse, get, web};
use validator::Validate;

use crate::auth::auth::{AuthUser, bearer_token};
use crate::error::{ApiError, ApiResult};
use crate::model::user::{LoginRequest, RegisterRequest, TokenPair, UserResponse};
use crate::service::auth::AuthService;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid payload or role"),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "Role other than EMPLOYEE without an Admin token"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Auth"
)]
pub async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let caller = bearer_token(&req).map(|token| service.authenticate(token)).transpose()?;
    let user = service.register(payload.into_inner(), caller.as_ref()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(service: web::Data<AuthService>, payload: web::Json<LoginRequest>) -> ApiResult<HttpResponse> {
    payload.validate()?;
    let tokens = service.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Expects the refresh token as the bearer credential.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Rotated token pair", body = TokenPair),
        (status = 401, description = "Missing, invalid or revoked refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(req: HttpRequest, service: web::Data<AuthService>) -> ApiResult<HttpResponse> {
    let token = bearer_token(&req).ok_or_else(|| ApiError::Unauthorized("No token".into()))?;
    let tokens = service.refresh(token).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// Always 204, whether or not the token was known.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Refresh token revoked")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(req: HttpRequest, service: web::Data<AuthService>) -> ApiResult<HttpResponse> {
    if let Some(token) = bearer_token(&req) {
        service.logout(token).await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

#[get("/me")]
pub async fn me(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "user_id": auth.user_id,
        "username": auth.username,
        "role": auth.role,
        "employee_id": auth.employee_id,
    }))
}
