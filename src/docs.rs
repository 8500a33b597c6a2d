use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::MessageResponse;
use crate::model::attendance_regularization::{
    AttendanceRegularization, CreateRegularization, RegularizationStatus, ReviewRegularization, UpdateRegularization,
};
use crate::model::camera_device::{CameraDevice, CreateCameraDevice, UpdateCameraDevice};
use crate::model::daily_attendance::{
    AttendanceStatus, CreateDailyAttendance, DailyAttendance, DailyAttendanceResponse, UpdateDailyAttendance,
};
use crate::model::department::{CreateDepartment, Department, DepartmentResponse, DepartmentSummary, UpdateDepartment};
use crate::model::designation::{CreateDesignation, Designation, DesignationSummary, UpdateDesignation};
use crate::model::employee::{CreateEmployee, EmployeeMaster, EmployeeResponse, EmployeeStatus, UpdateEmployee};
use crate::model::employee_assignment::{
    AssignmentResponse, AssignmentStatus, CreateAssignment, EmployeeAssignment, UpdateAssignment,
};
use crate::model::face_enrollment::{
    CreateFaceEnrollment, EnrollmentStatus, FaceEnrollment, FaceEnrollmentResponse, UpdateFaceEnrollment,
};
use crate::model::face_recognition_log::{
    CreateFaceLog, FaceLogResponse, FaceLogStatistics, FaceRecognitionLog, RecognitionStatus, UpdateFaceLog,
};
use crate::model::gps_punch::{CreateGpsPunch, GpsPunch, GpsPunchResponse, PunchStatus, PunchType};
use crate::model::leave_application::{
    ApproveLeave, CreateLeaveApplication, LeaveApplication, LeaveApplicationResponse, LeaveStatus, RejectLeave,
    UpdateLeaveApplication,
};
use crate::model::leave_balance::{CreateLeaveBalance, LeaveBalance, LeaveBalanceResponse, UpdateLeaveBalance};
use crate::model::leave_policy::{CreateLeavePolicy, LeavePolicy, UpdateLeavePolicy};
use crate::model::location::{CreateLocation, Location, LocationSummary, UpdateLocation};
use crate::model::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use crate::model::project_category::{
    CreateProjectCategory, ProjectCategory, ProjectCategoryResponse, UpdateProjectCategory,
};
use crate::model::project_document::{
    CreateProjectDocument, ProjectDocument, ProjectDocumentResponse, UpdateProjectDocument,
};
use crate::model::role::Role;
use crate::model::salary_template::{
    CalculationType, ComponentType, ComponentValue, CreateSalaryTemplate, SalaryComponent, SalaryTemplate,
    SalaryTemplateResponse, Taxable, UpdateSalaryTemplate,
};
use crate::model::shift::{CreateShift, Shift, ShiftResponse, UpdateShift};
use crate::model::staff_profile::{StaffProfile, StaffStatus};
use crate::model::user::{LoginRequest, RegisterRequest, TokenPair, UserResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce HRM API",
        version = "1.0.0",
        description = r#"
## Workforce Management API

Organization setup, employee records, leave, attendance and
face-recognition records for a single organization.

### Key Features
- **Organization**: locations, departments, designations, shifts, salary templates
- **Employees**: employee master records, staff profiles, project assignments
- **Projects**: project categories, projects and project documents
- **Leave**: policies, balances, applications with approve/reject
- **Attendance**: daily attendance, regularization requests, GPS punches
- **Face recognition**: camera devices, recognition logs, enrollments with image upload

### Security
Everything except `/auth/*` requires a **JWT Bearer** access token.
Approving or rejecting leave and regularizations needs the **HR** or **Admin** role.

### Response Format
- JSON bodies with `snake_case` fields
- Errors carry `{"message": ...}`; validation failures add per-field `errors`
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::location::create_location,
        crate::api::location::list_locations,
        crate::api::location::get_location,
        crate::api::location::update_location,
        crate::api::location::delete_location,
        crate::api::location::toggle_location,

        crate::api::department::create_department,
        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,
        crate::api::department::toggle_department,

        crate::api::designation::create_designation,
        crate::api::designation::list_designations,
        crate::api::designation::get_designation,
        crate::api::designation::update_designation,
        crate::api::designation::delete_designation,
        crate::api::designation::toggle_designation,

        crate::api::shift::create_shift,
        crate::api::shift::list_shifts,
        crate::api::shift::get_shift,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,
        crate::api::shift::toggle_shift,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::ensure_staff_profile,

        crate::api::project_category::create_project_category,
        crate::api::project_category::list_project_categories,
        crate::api::project_category::get_project_category,
        crate::api::project_category::update_project_category,
        crate::api::project_category::delete_project_category,
        crate::api::project_category::toggle_project_category,

        crate::api::project::create_project,
        crate::api::project::list_projects,
        crate::api::project::get_project,
        crate::api::project::update_project,
        crate::api::project::delete_project,

        crate::api::project_document::create_project_document,
        crate::api::project_document::list_project_documents,
        crate::api::project_document::get_project_document,
        crate::api::project_document::update_project_document,
        crate::api::project_document::delete_project_document,

        crate::api::employee_assignment::create_assignment,
        crate::api::employee_assignment::list_assignments,
        crate::api::employee_assignment::get_assignment,
        crate::api::employee_assignment::update_assignment,
        crate::api::employee_assignment::delete_assignment,

        crate::api::salary_template::create_salary_template,
        crate::api::salary_template::list_salary_templates,
        crate::api::salary_template::get_salary_template,
        crate::api::salary_template::update_salary_template,
        crate::api::salary_template::delete_salary_template,
        crate::api::salary_template::toggle_salary_template,

        crate::api::leave_policy::create_leave_policy,
        crate::api::leave_policy::list_leave_policies,
        crate::api::leave_policy::get_leave_policy,
        crate::api::leave_policy::update_leave_policy,
        crate::api::leave_policy::delete_leave_policy,
        crate::api::leave_policy::toggle_leave_policy,

        crate::api::leave_application::create_leave_application,
        crate::api::leave_application::list_leave_applications,
        crate::api::leave_application::get_leave_application,
        crate::api::leave_application::update_leave_application,
        crate::api::leave_application::delete_leave_application,
        crate::api::leave_application::approve_leave_application,
        crate::api::leave_application::reject_leave_application,

        crate::api::leave_balance::create_leave_balance,
        crate::api::leave_balance::list_leave_balances,
        crate::api::leave_balance::get_leave_balance,
        crate::api::leave_balance::update_leave_balance,
        crate::api::leave_balance::delete_leave_balance,

        crate::api::daily_attendance::create_attendance,
        crate::api::daily_attendance::list_attendance,
        crate::api::daily_attendance::get_attendance,
        crate::api::daily_attendance::update_attendance,
        crate::api::daily_attendance::delete_attendance,

        crate::api::attendance_regularization::create_regularization,
        crate::api::attendance_regularization::list_regularizations,
        crate::api::attendance_regularization::get_regularization,
        crate::api::attendance_regularization::update_regularization,
        crate::api::attendance_regularization::delete_regularization,
        crate::api::attendance_regularization::approve_regularization,
        crate::api::attendance_regularization::reject_regularization,

        crate::api::gps_punch::create_gps_punch,
        crate::api::gps_punch::list_gps_punches,

        crate::api::camera_device::create_camera_device,
        crate::api::camera_device::list_camera_devices,
        crate::api::camera_device::get_camera_device,
        crate::api::camera_device::update_camera_device,
        crate::api::camera_device::delete_camera_device,
        crate::api::camera_device::toggle_camera_device,

        crate::api::face_recognition_log::create_face_log,
        crate::api::face_recognition_log::list_face_logs,
        crate::api::face_recognition_log::recent_face_logs,
        crate::api::face_recognition_log::face_log_statistics,
        crate::api::face_recognition_log::get_face_log,
        crate::api::face_recognition_log::update_face_log,
        crate::api::face_recognition_log::delete_face_log,

        crate::api::face_enrollment::create_face_enrollment,
        crate::api::face_enrollment::list_face_enrollments,
        crate::api::face_enrollment::face_enrollment_for_employee,
        crate::api::face_enrollment::get_face_enrollment,
        crate::api::face_enrollment::update_face_enrollment,
        crate::api::face_enrollment::delete_face_enrollment,
        crate::api::face_enrollment::upload_face_image
    ),
    components(
        schemas(
            MessageResponse,
            Role, RegisterRequest, LoginRequest, TokenPair, UserResponse,
            Location, CreateLocation, UpdateLocation, LocationSummary,
            Department, CreateDepartment, UpdateDepartment, DepartmentResponse, DepartmentSummary,
            Designation, CreateDesignation, UpdateDesignation, DesignationSummary,
            Shift, CreateShift, UpdateShift, ShiftResponse,
            EmployeeMaster, EmployeeStatus, CreateEmployee, UpdateEmployee, EmployeeResponse,
            StaffProfile, StaffStatus,
            ProjectCategory, CreateProjectCategory, UpdateProjectCategory, ProjectCategoryResponse,
            Project, ProjectStatus, CreateProject, UpdateProject,
            ProjectDocument, CreateProjectDocument, UpdateProjectDocument, ProjectDocumentResponse,
            EmployeeAssignment, AssignmentStatus, CreateAssignment, UpdateAssignment, AssignmentResponse,
            SalaryTemplate, SalaryComponent, ComponentType, CalculationType, Taxable, ComponentValue,
            CreateSalaryTemplate, UpdateSalaryTemplate, SalaryTemplateResponse,
            LeavePolicy, CreateLeavePolicy, UpdateLeavePolicy,
            LeaveApplication, LeaveStatus, CreateLeaveApplication, UpdateLeaveApplication, ApproveLeave, RejectLeave,
            LeaveApplicationResponse,
            LeaveBalance, CreateLeaveBalance, UpdateLeaveBalance, LeaveBalanceResponse,
            DailyAttendance, AttendanceStatus, CreateDailyAttendance, UpdateDailyAttendance, DailyAttendanceResponse,
            AttendanceRegularization, RegularizationStatus, CreateRegularization, UpdateRegularization,
            ReviewRegularization,
            GpsPunch, PunchType, PunchStatus, CreateGpsPunch, GpsPunchResponse,
            CameraDevice, CreateCameraDevice, UpdateCameraDevice,
            FaceRecognitionLog, RecognitionStatus, CreateFaceLog, UpdateFaceLog, FaceLogResponse, FaceLogStatistics,
            FaceEnrollment, EnrollmentStatus, CreateFaceEnrollment, UpdateFaceEnrollment, FaceEnrollmentResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token rotation"),
        (name = "Locations", description = "Branch locations"),
        (name = "Departments", description = "Department management APIs"),
        (name = "Designations", description = "Designation management APIs"),
        (name = "Shifts", description = "Work shift definitions"),
        (name = "Employees", description = "Employee master records"),
        (name = "Project Categories", description = "Project category management APIs"),
        (name = "Projects", description = "Project management APIs"),
        (name = "Project Documents", description = "Documents filed under projects"),
        (name = "Employee Assignments", description = "Employee to project assignments"),
        (name = "Salary Templates", description = "Salary structure templates"),
        (name = "Leave Policies", description = "Leave type policies"),
        (name = "Leave Applications", description = "Leave requests with approve/reject"),
        (name = "Leave Balances", description = "Per-year leave balances"),
        (name = "Daily Attendance", description = "Daily attendance records"),
        (name = "Attendance Regularizations", description = "Attendance correction requests"),
        (name = "GPS Punches", description = "Location-tagged punches"),
        (name = "Camera Devices", description = "Face recognition cameras"),
        (name = "Face Recognition Logs", description = "Recognition events and statistics"),
        (name = "Face Enrollments", description = "Enrolled faces and images"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protected_scope_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/locations",
            "/api/employees/{id}/staff-profile",
            "/api/leave-applications/{id}/approve",
            "/api/face-recognition-logs/statistics",
            "/api/face-enrollments/{id}/upload-image",
            "/api/project-documents/{id}",
            "/auth/login",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
