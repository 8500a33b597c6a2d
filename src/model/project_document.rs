use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::timestamp;

/// A file or link filed under a project (drawings, contracts, permits).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectDocument {
    pub id: String,
    pub project_id: String,
    #[schema(example = "Site survey report")]
    pub document_name: String,
    #[schema(example = "SURVEY")]
    pub category: Option<String>,
    pub description: Option<String>,
    #[schema(example = "https://files.example.com/survey.pdf")]
    pub file_url: Option<String>,
    #[schema(example = "application/pdf")]
    pub file_type: Option<String>,
    /// Bytes.
    pub file_size: Option<u64>,
    pub uploaded_by: Option<String>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(ProjectDocument, "project_documents", "Project document");

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProjectDocument {
    #[validate(length(min = 1, message = "project_id is required"))]
    pub project_id: String,
    #[validate(length(min = 1, message = "document_name is required"))]
    pub document_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
    pub uploaded_by: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProjectDocument {
    #[validate(length(min = 1))]
    pub project_id: Option<String>,
    #[validate(length(min = 1))]
    pub document_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
    pub uploaded_by: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectDocumentQuery {
    pub project_id: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectDocumentResponse {
    #[serde(flatten)]
    pub document: ProjectDocument,
    pub project_name: Option<String>,
    pub project_code: Option<String>,
}
