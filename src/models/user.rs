// src/models/user.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

const MIN_PICTURE_BASE64_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[sqlx(rename = "System Admin")]
    #[serde(rename = "System Admin")]
    SystemAdmin,

    #[sqlx(rename = "Company Admin")]
    #[serde(rename = "Company Admin")]
    CompanyAdmin,

    #[sqlx(rename = "HR")]
    #[serde(rename = "HR")]
    Hr,

    Accountant,
    Manager,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

// A user row. The hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Gender,
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub role: UserRole,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub status: bool,
    pub profile_picture: Option<String>,
    pub department_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// User joined with its department name, used by list/get/profile
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithDepartment {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub department_name: Option<String>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Gender,
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,
    pub role: UserRole,
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub status: Option<bool>,
    pub profile_picture: Option<String>,
    pub department_id: Option<i32>,
}

// Partial update: absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    pub profile_picture: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordPayload {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

/// Body of every status toggle (users, departments).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: bool,
}

/// Picker entry for the document upload and employee forms.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AvailableUser {
    pub label: String,
    pub value: i32,
    pub name: String,
}

/// Profile pictures arrive as `data:image/...;base64,...` URLs; a truncated
/// upload shows up as a short base64 tail.
pub fn check_profile_picture(picture: &str) -> Result<(), AppError> {
    if !picture.starts_with("data:image/") || picture.len() < MIN_PICTURE_BASE64_LEN {
        return Err(AppError::Validation("Invalid profile picture data".into()));
    }

    let base64_len = picture.split_once(',').map(|(_, data)| data.len()).unwrap_or(0);
    if base64_len < MIN_PICTURE_BASE64_LEN {
        return Err(AppError::Validation("Incomplete profile picture data".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_round_trip_through_json() {
        let json = serde_json::to_string(&UserRole::SystemAdmin).unwrap();
        assert_eq!(json, "\"System Admin\"");
        let hr: UserRole = serde_json::from_str("\"HR\"").unwrap();
        assert_eq!(hr, UserRole::Hr);
    }

    #[test]
    fn accepts_a_complete_picture() {
        let picture = format!("data:image/png;base64,{}", "A".repeat(120));
        assert!(check_profile_picture(&picture).is_ok());
    }

    #[test]
    fn rejects_non_image_data_urls() {
        let picture = format!("data:application/pdf;base64,{}", "A".repeat(120));
        let err = check_profile_picture(&picture).unwrap_err();
        assert_eq!(err.to_string(), "Invalid profile picture data");
    }

    #[test]
    fn rejects_truncated_base64() {
        // Long enough overall, but the payload after the comma is short.
        let picture = format!("data:image/png;name={};base64,{}", "n".repeat(100), "A".repeat(10));
        let err = check_profile_picture(&picture).unwrap_err();
        assert_eq!(err.to_string(), "Incomplete profile picture data");
    }
}
