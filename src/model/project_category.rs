use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectCategory {
    pub id: String,
    #[schema(example = "Construction")]
    pub category_name: String,
    #[schema(example = "CONST")]
    pub category_code: String,
    pub description: String,
    #[schema(example = "#3b82f6")]
    pub color: Option<String>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(ProjectCategory, "project_categories", "Project category", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProjectCategory {
    #[validate(length(min = 1, message = "category_name is required"))]
    pub category_name: String,
    #[validate(length(min = 1, max = 64, message = "category_code must be 1-64 characters"))]
    pub category_code: String,
    pub description: String,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProjectCategory {
    #[validate(length(min = 1))]
    pub category_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category_code: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectCategoryResponse {
    #[serde(flatten)]
    pub category: ProjectCategory,
    pub project_count: u64,
}
