use std::collections::HashMap;

use actix_web::web;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeMaster;
use crate::model::enum_value;
use crate::model::face_enrollment::{
    CreateFaceEnrollment, EnrollmentStatus, FaceEnrollment, FaceEnrollmentQuery, FaceEnrollmentResponse,
    UpdateFaceEnrollment,
};
use crate::store::{Filter, Query, Store, StoreError, new_id};
use crate::utils::apply_patch;
use crate::utils::upload::{MAX_FACE_IMAGE_BYTES, image_extension, read_face_image, store_face_image};

use super::daily_attendance::employees_matching;
use super::guards::{delete_record, ensure_exists, now, parse_filter};

const ALREADY_ENROLLED: &str = "Face enrollment already exists for this employee";

/// Raw image upload as received by the handler.
pub struct ImageUpload {
    pub bytes: web::Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct FaceEnrollmentService {
    store: Store,
    upload_dir: String,
}

impl FaceEnrollmentService {
    pub fn new(store: Store, upload_dir: impl Into<String>) -> Self {
        Self { store, upload_dir: upload_dir.into() }
    }

    pub async fn create(&self, dto: CreateFaceEnrollment) -> ApiResult<FaceEnrollmentResponse> {
        ensure_exists::<EmployeeMaster>(&self.store, &dto.employee_master_id).await?;
        if self.find_by_employee(&dto.employee_master_id).await?.is_some() {
            return Err(ApiError::Conflict(ALREADY_ENROLLED.into()));
        }

        let now = now();
        let enrollment = FaceEnrollment {
            id: new_id(),
            employee_master_id: dto.employee_master_id,
            status: dto.status.unwrap_or_default(),
            image_url: None,
            image_name: None,
            image_size: None,
            enrolled_at: None,
            remarks: dto.remarks,
            created_at: now,
            updated_at: now,
        };
        match self.store.create(&enrollment).await {
            Err(StoreError::Conflict(_)) => return Err(ApiError::Conflict(ALREADY_ENROLLED.into())),
            other => other?,
        }

        info!(id = %enrollment.id, employee_id = %enrollment.employee_master_id, "Face enrollment created");
        self.respond_one(enrollment).await
    }

    pub async fn list(&self, query: FaceEnrollmentQuery) -> ApiResult<Vec<FaceEnrollmentResponse>> {
        let mut filter = Filter::new().eq_opt(
            "employee_master_id",
            query.employee_master_id.filter(|v| !v.is_empty()),
        );
        if let Some(raw) = query.status.as_deref().filter(|v| !v.is_empty()) {
            let status: EnrollmentStatus = parse_filter("status", raw)?;
            filter = filter.eq("status", enum_value(&status));
        }
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            filter = filter.is_in("employee_master_id", employees_matching(&self.store, term).await?);
        }

        let enrollments = self
            .store
            .find_many(Query::new(filter).newest_first("created_at"))
            .await?;
        self.respond(enrollments).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<FaceEnrollmentResponse> {
        let enrollment: FaceEnrollment = ensure_exists(&self.store, id).await?;
        self.respond_one(enrollment).await
    }

    /// `None` when the employee has not been enrolled yet.
    pub async fn find_by_employee(&self, employee_id: &str) -> ApiResult<Option<FaceEnrollmentResponse>> {
        let found = self
            .store
            .find_first::<FaceEnrollment>(Filter::new().eq("employee_master_id", employee_id))
            .await?;
        match found {
            Some(enrollment) => self.respond_one(enrollment).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn update(&self, id: &str, dto: UpdateFaceEnrollment) -> ApiResult<FaceEnrollmentResponse> {
        let current: FaceEnrollment = ensure_exists(&self.store, id).await?;
        let mut updated = apply_patch(&current, &dto)?;
        updated.updated_at = now();
        self.store.update(&updated).await?;
        self.respond_one(updated).await
    }

    /// Stores the image and marks the enrollment ENROLLED.
    pub async fn upload_image(&self, id: &str, upload: ImageUpload) -> ApiResult<FaceEnrollmentResponse> {
        let mut enrollment: FaceEnrollment = ensure_exists(&self.store, id).await?;

        if upload.bytes.is_empty() {
            return Err(ApiError::BadRequest("Image file is required".into()));
        }
        if upload.bytes.len() > MAX_FACE_IMAGE_BYTES {
            return Err(ApiError::BadRequest("Image exceeds the 5 MB limit".into()));
        }
        let ext = image_extension(upload.file_name.as_deref(), upload.content_type.as_deref())
            .ok_or_else(|| ApiError::BadRequest("Image must be jpg, jpeg, png or webp".into()))?;

        let size = upload.bytes.len() as u64;
        let dir = self.upload_dir.clone();
        let bytes = upload.bytes;
        let stored = web::block(move || store_face_image(&dir, &ext, &bytes))
            .await
            .map_err(|e| {
                error!(error = %e, "Image write task failed");
                ApiError::Internal
            })?
            .map_err(|e| {
                error!(error = %e, "Could not write face image");
                ApiError::Internal
            })?;

        let now = now();
        enrollment.status = EnrollmentStatus::Enrolled;
        enrollment.image_name = Some(upload.file_name.unwrap_or_else(|| {
            stored
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        }));
        enrollment.image_url = Some(stored.url);
        enrollment.image_size = Some(size);
        enrollment.enrolled_at = Some(now);
        enrollment.updated_at = now;
        self.store.update(&enrollment).await?;

        info!(id, size, "Face image uploaded");
        self.respond_one(enrollment).await
    }

    /// Bytes and content type of a previously uploaded image.
    pub async fn image(&self, file_name: &str) -> ApiResult<(Vec<u8>, &'static str)> {
        let dir = self.upload_dir.clone();
        let name = file_name.to_string();
        web::block(move || read_face_image(&dir, &name))
            .await
            .map_err(|e| {
                error!(error = %e, "Image read task failed");
                ApiError::Internal
            })?
            .map_err(|e| {
                error!(error = %e, "Could not read face image");
                ApiError::Internal
            })?
            .ok_or_else(|| ApiError::not_found("Image"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        delete_record::<FaceEnrollment>(&self.store, id).await
    }

    async fn respond_one(&self, enrollment: FaceEnrollment) -> ApiResult<FaceEnrollmentResponse> {
        self.respond(vec![enrollment]).await?.pop().ok_or(ApiError::Internal)
    }

    async fn respond(&self, enrollments: Vec<FaceEnrollment>) -> ApiResult<Vec<FaceEnrollmentResponse>> {
        let employees: HashMap<String, EmployeeMaster> = self
            .store
            .find_by_ids(enrollments.iter().map(|e| e.employee_master_id.clone()))
            .await?;

        Ok(enrollments
            .into_iter()
            .map(|enrollment| {
                let employee = employees.get(&enrollment.employee_master_id);
                FaceEnrollmentResponse {
                    employee_name: employee.map(EmployeeMaster::full_name),
                    employee_code: employee.map(|e| e.employee_code.clone()),
                    enrollment,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::employee::{EmployeeService, tests::new_employee};

    async fn setup(upload_dir: &str) -> (FaceEnrollmentService, String) {
        let store = Store::in_memory();
        let employee = EmployeeService::new(store.clone())
            .create(new_employee("Ann", "Lee", Some("E-1")))
            .await
            .unwrap()
            .employee;
        (FaceEnrollmentService::new(store, upload_dir), employee.id)
    }

    fn enroll(employee_id: &str) -> CreateFaceEnrollment {
        CreateFaceEnrollment { employee_master_id: employee_id.into(), status: None, remarks: None }
    }

    fn temp_dir() -> String {
        std::env::temp_dir()
            .join(format!("face-upload-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[actix_web::test]
    async fn one_enrollment_per_employee() {
        let (service, employee_id) = setup("unused").await;
        let created = service.create(enroll(&employee_id)).await.unwrap();
        assert_eq!(created.enrollment.status, EnrollmentStatus::Pending);
        assert_eq!(created.employee_code.as_deref(), Some("E-1"));

        assert!(matches!(service.create(enroll(&employee_id)).await, Err(ApiError::Conflict(_))));
    }

    #[actix_web::test]
    async fn find_by_employee_is_none_before_enrolling() {
        let (service, employee_id) = setup("unused").await;
        assert!(service.find_by_employee(&employee_id).await.unwrap().is_none());

        service.create(enroll(&employee_id)).await.unwrap();
        assert!(service.find_by_employee(&employee_id).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn upload_marks_enrolled() {
        let dir = temp_dir();
        let (service, employee_id) = setup(&dir).await;
        let created = service.create(enroll(&employee_id)).await.unwrap();

        let uploaded = service
            .upload_image(
                &created.enrollment.id,
                ImageUpload {
                    bytes: web::Bytes::from_static(b"\x89PNG fake"),
                    file_name: Some("ann.png".into()),
                    content_type: None,
                },
            )
            .await
            .unwrap();

        let enrollment = uploaded.enrollment;
        assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
        assert_eq!(enrollment.image_name.as_deref(), Some("ann.png"));
        assert_eq!(enrollment.image_size, Some(9));
        assert!(enrollment.enrolled_at.is_some());
        let url = enrollment.image_url.unwrap();
        assert!(url.starts_with("/uploads/face-images/") && url.ends_with(".png"));

        let file_name = url.trim_start_matches("/uploads/face-images/");
        let (bytes, content_type) = service.image(file_name).await.unwrap();
        assert_eq!(bytes, b"\x89PNG fake");
        assert_eq!(content_type, "image/png");
        assert!(matches!(service.image("nope.png").await, Err(ApiError::NotFound(_))));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[actix_web::test]
    async fn upload_rejects_bad_files() {
        let (service, employee_id) = setup("unused").await;
        let created = service.create(enroll(&employee_id)).await.unwrap();
        let id = created.enrollment.id;

        let wrong_type = ImageUpload {
            bytes: web::Bytes::from_static(b"%PDF"),
            file_name: Some("cv.pdf".into()),
            content_type: None,
        };
        assert!(matches!(service.upload_image(&id, wrong_type).await, Err(ApiError::BadRequest(_))));

        let too_big = ImageUpload {
            bytes: web::Bytes::from(vec![0u8; MAX_FACE_IMAGE_BYTES + 1]),
            file_name: Some("big.jpg".into()),
            content_type: None,
        };
        assert!(matches!(service.upload_image(&id, too_big).await, Err(ApiError::BadRequest(_))));

        let still_pending = service.get(&id).await.unwrap();
        assert_eq!(still_pending.enrollment.status, EnrollmentStatus::Pending);
    }
}
