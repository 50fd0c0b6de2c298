// src/models/department.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentPayload {
    #[validate(length(min = 1, message = "Department name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentPayload {
    #[validate(length(min = 1, message = "Department name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

impl CreateDepartmentPayload {
    /// Whitespace-only names count as missing.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}
