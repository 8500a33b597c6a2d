//! Business rules for every module. Each service owns a [`Store`] handle and
//! is registered as `web::Data<...>` application state.

pub mod attendance_regularization;
pub mod auth;
pub mod camera_device;
pub mod daily_attendance;
pub mod department;
pub mod designation;
pub mod employee;
pub mod employee_assignment;
pub mod face_enrollment;
pub mod face_recognition_log;
pub mod gps_punch;
pub mod guards;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_policy;
pub mod location;
pub mod project;
pub mod project_category;
pub mod project_document;
pub mod roster;
pub mod salary_template;
pub mod shift;
pub mod staff_profile;

use actix_web::web;

use crate::config::Config;
use crate::store::Store;

/// Registers every service as application data over one shared store.
pub fn register(cfg: &mut web::ServiceConfig, store: &Store, config: &Config) {
    let store = store.clone();
    cfg.app_data(web::Data::new(auth::AuthService::new(store.clone(), config)))
        .app_data(web::Data::new(location::LocationService::new(store.clone())))
        .app_data(web::Data::new(department::DepartmentService::new(store.clone())))
        .app_data(web::Data::new(designation::DesignationService::new(store.clone())))
        .app_data(web::Data::new(shift::ShiftService::new(store.clone())))
        .app_data(web::Data::new(employee::EmployeeService::new(store.clone())))
        .app_data(web::Data::new(staff_profile::StaffProfileService::new(store.clone())))
        .app_data(web::Data::new(project_category::ProjectCategoryService::new(store.clone())))
        .app_data(web::Data::new(project::ProjectService::new(store.clone())))
        .app_data(web::Data::new(project_document::ProjectDocumentService::new(store.clone())))
        .app_data(web::Data::new(employee_assignment::EmployeeAssignmentService::new(store.clone())))
        .app_data(web::Data::new(salary_template::SalaryTemplateService::new(store.clone())))
        .app_data(web::Data::new(leave_policy::LeavePolicyService::new(store.clone())))
        .app_data(web::Data::new(leave_application::LeaveApplicationService::new(store.clone())))
        .app_data(web::Data::new(leave_balance::LeaveBalanceService::new(store.clone())))
        .app_data(web::Data::new(daily_attendance::DailyAttendanceService::new(store.clone())))
        .app_data(web::Data::new(attendance_regularization::RegularizationService::new(store.clone())))
        .app_data(web::Data::new(gps_punch::GpsPunchService::new(store.clone())))
        .app_data(web::Data::new(camera_device::CameraDeviceService::new(store.clone())))
        .app_data(web::Data::new(face_recognition_log::FaceLogService::new(store.clone())))
        .app_data(web::Data::new(face_enrollment::FaceEnrollmentService::new(
            store,
            config.upload_dir.clone(),
        )));
}
