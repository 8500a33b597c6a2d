use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

use crate::api::{
    attendance_regularization, camera_device, daily_attendance, department, designation, employee, employee_assignment,
    face_enrollment, face_recognition_log, gps_punch, leave_application, leave_balance, leave_policy, location, project,
    project_category, project_document, salary_template, shift,
};
use crate::auth::{handlers, middleware::auth_middleware};
use crate::config::Config;
use crate::error::ApiError;
use crate::utils::upload::MAX_FACE_IMAGE_BYTES;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg: GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// Malformed JSON bodies and query strings answer with the same
/// `{"message": ...}` shape as every other error.
fn extractor_errors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()));
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    extractor_errors(cfg);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Uploaded images are public, like the URLs handed out for them
    cfg.service(
        web::resource("/uploads/face-images/{file_name}")
            .wrap(protected_limiter.clone())
            .route(web::get().to(face_enrollment::face_image)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter.clone()) // rate limiting
            .service(handlers::me)
            .service(web::scope("/locations").configure(location::routes))
            .service(web::scope("/departments").configure(department::routes))
            .service(web::scope("/designations").configure(designation::routes))
            .service(web::scope("/shifts").configure(shift::routes))
            .service(web::scope("/employees").configure(employee::routes))
            .service(web::scope("/project-categories").configure(project_category::routes))
            .service(web::scope("/projects").configure(project::routes))
            .service(web::scope("/project-documents").configure(project_document::routes))
            .service(web::scope("/employee-assignments").configure(employee_assignment::routes))
            .service(web::scope("/salary-templates").configure(salary_template::routes))
            .service(web::scope("/leave-policies").configure(leave_policy::routes))
            .service(web::scope("/leave-applications").configure(leave_application::routes))
            .service(web::scope("/leave-balances").configure(leave_balance::routes))
            .service(web::scope("/daily-attendance").configure(daily_attendance::routes))
            .service(web::scope("/attendance-regularizations").configure(attendance_regularization::routes))
            .service(web::scope("/gps-punches").configure(gps_punch::routes))
            .service(web::scope("/camera-devices").configure(camera_device::routes))
            .service(web::scope("/face-recognition-logs").configure(face_recognition_log::routes))
            .service(
                web::scope("/face-enrollments")
                    // raw image bodies; the service enforces the exact limit
                    .app_data(web::PayloadConfig::new(MAX_FACE_IMAGE_BYTES + 1))
                    .configure(face_enrollment::routes),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with Authorization: Bearer refresh_token
//       └─ returns a new pair, the old refresh token is revoked

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::service;
    use crate::store::Store;

    const PEER: &str = "127.0.0.1:40000";

    macro_rules! app {
        () => {{
            let config = Config::for_tests();
            let store = Store::in_memory();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config.clone()))
                    .configure(|cfg| service::register(cfg, &store, &config))
                    .configure(|cfg| configure(cfg, config.clone())),
            )
            .await
        }};
    }

    fn post(uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post().uri(uri).peer_addr(PEER.parse().unwrap()).set_json(body)
    }

    fn get(uri: &str, token: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token)))
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    /// Registers (optionally as `$admin`) and returns the status.
    macro_rules! register {
        ($app:expr, $username:expr, $role_id:expr, $admin:expr) => {{
            let mut req = post(
                "/auth/register",
                json!({ "username": $username, "password": "s3cret-pass", "role_id": $role_id }),
            );
            if let Some(admin) = $admin {
                req = req.insert_header(bearer(admin));
            }
            test::call_service(&$app, req.to_request()).await.status()
        }};
    }

    macro_rules! login {
        ($app:expr, $username:expr) => {{
            let login = post("/auth/login", json!({ "username": $username, "password": "s3cret-pass" })).to_request();
            let tokens: Value = test::call_and_read_body_json(&$app, login).await;
            tokens["access_token"].as_str().unwrap().to_string()
        }};
    }

    macro_rules! token_for {
        ($app:expr, $username:expr, $role_id:expr) => {
            token_for!($app, $username, $role_id, None::<&str>)
        };
        ($app:expr, $username:expr, $role_id:expr, $admin:expr) => {{
            assert_eq!(register!($app, $username, $role_id, $admin), StatusCode::CREATED);
            login!($app, $username)
        }};
    }

    #[actix_web::test]
    async fn protected_routes_need_a_token() {
        let app = app!();
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/locations").peer_addr(PEER.parse().unwrap()).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_then_list_locations() {
        let app = app!();
        let token = token_for!(app, "hr.lead", 2);

        let create = post("/api/locations", json!({ "branch_name": "Head Office", "branch_code": "HO" }))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, create).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let duplicate = post("/api/locations", json!({ "branch_name": "Again", "branch_code": "HO" }))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, duplicate).await.status(), StatusCode::CONFLICT);

        let listed: Value = test::call_and_read_body_json(&app, get("/api/locations", &token).to_request()).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
        assert_eq!(listed[0]["branch_code"], "HO");
    }

    #[actix_web::test]
    async fn invalid_payload_is_a_bad_request_with_field_errors() {
        let app = app!();
        let token = token_for!(app, "hr.lead", 2);

        let create = post(
            "/api/shifts",
            json!({ "shift_name": "Day", "shift_code": "D", "start_time": "9am", "end_time": "18:00", "working_days": [] }),
        )
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
        let resp = test::call_service(&app, create).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["start_time"].is_array());
    }

    #[actix_web::test]
    async fn elevated_registration_needs_an_admin_token() {
        let app = app!();
        let admin = token_for!(app, "root", 1);

        assert_eq!(register!(app, "mallory", 1, None::<&str>), StatusCode::FORBIDDEN);
        let staff = token_for!(app, "staff", 3);
        assert_eq!(register!(app, "mallory", 2, Some(staff.as_str())), StatusCode::FORBIDDEN);
        assert_eq!(register!(app, "mallory", 2, Some("not-a-token")), StatusCode::UNAUTHORIZED);
        assert_eq!(register!(app, "hr.lead", 2, Some(admin.as_str())), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn approving_leave_needs_hr_or_admin() {
        let app = app!();
        let admin = token_for!(app, "root", 1);
        let employee_token = token_for!(app, "staff", 3);

        let approve = post("/api/leave-applications/any-id/approve", json!({}))
            .insert_header(("Authorization", format!("Bearer {}", employee_token)))
            .to_request();
        assert_eq!(test::call_service(&app, approve).await.status(), StatusCode::FORBIDDEN);

        let hr_token = token_for!(app, "hr.lead", 2, Some(admin.as_str()));
        let approve = post("/api/leave-applications/any-id/approve", json!({}))
            .insert_header(("Authorization", format!("Bearer {}", hr_token)))
            .to_request();
        assert_eq!(test::call_service(&app, approve).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn patching_leave_to_approved_needs_hr_or_admin() {
        let app = app!();
        let admin = token_for!(app, "root", 1);
        let hr_token = token_for!(app, "hr.lead", 2, Some(admin.as_str()));
        let staff_token = token_for!(app, "staff", 3);

        let employee: Value = test::call_and_read_body_json(
            &app,
            post(
                "/api/employees",
                json!({ "first_name": "Ann", "last_name": "Lee", "email": "ann@example.com", "phone": "+100" }),
            )
            .insert_header(bearer(&staff_token))
            .to_request(),
        )
        .await;
        let policy: Value = test::call_and_read_body_json(
            &app,
            post(
                "/api/leave-policies",
                json!({ "policy_name": "Annual", "policy_code": "AL", "leave_type": "ANNUAL", "days_per_year": 20 }),
            )
            .insert_header(bearer(&staff_token))
            .to_request(),
        )
        .await;
        let application: Value = test::call_and_read_body_json(
            &app,
            post(
                "/api/leave-applications",
                json!({
                    "employee_master_id": employee["id"],
                    "leave_policy_id": policy["id"],
                    "start_date": "2025-03-10",
                    "end_date": "2025-03-11",
                    "reason": "Family trip"
                }),
            )
            .insert_header(bearer(&staff_token))
            .to_request(),
        )
        .await;
        let uri = format!("/api/leave-applications/{}", application["id"].as_str().unwrap());
        let patch = |token: &str, body: Value| {
            test::TestRequest::patch()
                .uri(&uri)
                .peer_addr(PEER.parse().unwrap())
                .insert_header(bearer(token))
                .set_json(body)
                .to_request()
        };

        let resp = test::call_service(&app, patch(&staff_token, json!({ "status": "APPROVED" }))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = test::call_service(&app, patch(&staff_token, json!({ "status": "REJECTED" }))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // non-decision edits stay open to the applicant
        let resp = test::call_service(&app, patch(&staff_token, json!({ "reason": "Wedding" }))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let me: Value = test::call_and_read_body_json(&app, get("/api/me", &hr_token).to_request()).await;
        let approved: Value =
            test::call_and_read_body_json(&app, patch(&hr_token, json!({ "status": "APPROVED" }))).await;
        assert_eq!(approved["status"], "APPROVED");
        assert_eq!(approved["approved_by"], me["user_id"]);
    }

    #[actix_web::test]
    async fn project_documents_delete_with_no_content() {
        let app = app!();
        let token = token_for!(app, "staff", 3);

        let project: Value = test::call_and_read_body_json(
            &app,
            post("/api/projects", json!({ "name": "Bridge", "code": "P1" })).insert_header(bearer(&token)).to_request(),
        )
        .await;
        let missing_project = post("/api/project-documents", json!({ "project_id": "ghost", "document_name": "Plan" }))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, missing_project).await.status(), StatusCode::NOT_FOUND);

        let document: Value = test::call_and_read_body_json(
            &app,
            post("/api/project-documents", json!({ "project_id": project["id"], "document_name": "Plan" }))
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(document["project_code"], "P1");

        let delete = test::TestRequest::delete()
            .uri(&format!("/api/project-documents/{}", document["id"].as_str().unwrap()))
            .peer_addr(PEER.parse().unwrap())
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn enrollment_lookup_by_employee_is_null_when_missing() {
        let app = app!();
        let token = token_for!(app, "hr.lead", 2);

        let body = test::call_and_read_body(&app, get("/api/face-enrollments/employee/nobody", &token).to_request()).await;
        assert_eq!(body.as_ref(), b"null");
    }
}
