use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = "8d3c6a1e-5b7f-4c1a-9b2e-1f0a7c9d2e11")]
    pub id: String,
    #[schema(example = "Head Office")]
    pub branch_name: String,
    #[schema(example = "HO-01")]
    pub branch_code: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    #[schema(example = "2026-01-01T00:00:00.000Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(example = "2026-01-01T00:00:00.000Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

record!(Location, "locations", "Location", active);

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLocation {
    #[validate(length(min = 1, message = "branch_name is required"))]
    #[schema(example = "Head Office")]
    pub branch_name: String,
    #[validate(length(min = 1, max = 64, message = "branch_code must be 1-64 characters"))]
    #[schema(example = "HO-01")]
    pub branch_code: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLocation {
    #[validate(length(min = 1))]
    pub branch_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub branch_code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

/// Compact location shape embedded in other responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationSummary {
    pub id: String,
    pub branch_name: String,
    pub branch_code: String,
}

impl From<&Location> for LocationSummary {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id.clone(),
            branch_name: l.branch_name.clone(),
            branch_code: l.branch_code.clone(),
        }
    }
}
