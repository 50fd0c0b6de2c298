// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_type")]
pub enum DocumentType {
    #[sqlx(rename = "Identification Docs")]
    #[serde(rename = "Identification Docs")]
    IdentificationDocs,

    #[sqlx(rename = "Right to Work Check")]
    #[serde(rename = "Right to Work Check")]
    RightToWorkCheck,

    Certificates,
    References,

    #[sqlx(rename = "Offer Letter")]
    #[serde(rename = "Offer Letter")]
    OfferLetter,

    Contracts,

    #[sqlx(rename = "Supporting Docs")]
    #[serde(rename = "Supporting Docs")]
    SupportingDocs,

    #[sqlx(rename = "CV")]
    #[serde(rename = "CV")]
    Cv,

    Other,
}

// Soft-delete lifecycle. Only Active documents are ever served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_status")]
pub enum DocumentStatus {
    Active,
    Inactive,
    Deleted,
}

/// Who a document belongs to. The table stores the two shapes in nullable
/// columns guarded by a CHECK constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DocumentOwner {
    Employee {
        #[serde(rename = "userId")]
        user_id: i32,
    },
    Applicant { name: String, email: Option<String> },
}

impl DocumentOwner {
    /// `(user_id, applicant_name, applicant_email)` column values.
    pub fn into_columns(self) -> (Option<i32>, Option<String>, Option<String>) {
        match self {
            DocumentOwner::Employee { user_id } => (Some(user_id), None, None),
            DocumentOwner::Applicant { name, email } => (None, Some(name), email),
        }
    }
}

// Full row, file data included. Only the detail endpoint reads it.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: i32,
    pub file_name: String,
    pub document_type: DocumentType,
    pub file_data: String,
    pub file_type: String,
    pub file_size: i64,
    pub user_id: Option<i32>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub user_email: Option<String>,
}

impl DocumentRow {
    pub fn owner(&self) -> Result<DocumentOwner, AppError> {
        match (self.user_id, &self.applicant_name) {
            (Some(user_id), None) => Ok(DocumentOwner::Employee { user_id }),
            (None, Some(name)) => Ok(DocumentOwner::Applicant {
                name: name.clone(),
                email: self.applicant_email.clone(),
            }),
            _ => Err(anyhow::anyhow!("document {} has no single owner", self.id).into()),
        }
    }
}

// List item: metadata only
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: i32,
    pub file_name: String,
    pub document_type: DocumentType,
    pub file_type: String,
    pub file_size: i64,
    pub user_id: Option<i32>,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owner's display name (user name for employee documents).
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub id: i32,
    pub file_name: String,
    pub document_type: DocumentType,
    pub file_type: String,
    pub file_size: i64,
    /// `data:<mime>;base64,<payload>`
    pub file_data: String,
    pub owner: DocumentOwner,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentDetail {
    /// Refuses to serve a payload that is visibly shorter than its declared size.
    pub fn from_row(row: DocumentRow) -> Result<Self, AppError> {
        ensure_intact(row.file_data.len(), row.file_size)?;

        let owner = row.owner()?;
        let (owner_name, owner_email) = match &owner {
            DocumentOwner::Employee { .. } => {
                let name = row.user_first_name.as_ref().map(|first| match &row.user_last_name {
                    Some(last) => format!("{} {}", first, last),
                    None => first.clone(),
                });
                (name, row.user_email.clone())
            }
            DocumentOwner::Applicant { name, email } => (Some(name.clone()), email.clone()),
        };

        Ok(Self {
            id: row.id,
            file_data: data_url(&row.file_type, &row.file_data),
            file_name: row.file_name,
            document_type: row.document_type,
            file_type: row.file_type,
            file_size: row.file_size,
            owner,
            owner_name,
            owner_email,
            created_at: row.created_at,
        })
    }
}

// --- INTEGRITY ---

/// Length of the base64 encoding of `file_size` raw bytes, ignoring padding.
/// Widened to `i128` so any declared `i64` size is representable.
pub fn expected_base64_len(file_size: i64) -> i128 {
    (i128::from(file_size.max(0)) * 4 + 2) / 3
}

/// Stored data shorter than 90% of the expected encoding is treated as a
/// truncated upload.
pub fn ensure_intact(stored_len: usize, file_size: i64) -> Result<(), AppError> {
    let expected = expected_base64_len(file_size);
    // stored < 0.9 * expected, in integers
    if (stored_len as i128) * 10 < expected * 9 {
        return Err(AppError::CorruptedDocument);
    }
    Ok(())
}

pub fn data_url(mime: &str, base64: &str) -> String {
    format!("data:{};base64,{}", mime, base64)
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadEmployeeDocumentPayload {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_name: String,
    pub document_type: DocumentType,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_data: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_type: String,
    #[validate(range(min = 1, message = "File size must be greater than zero"))]
    pub file_size: i64,
    pub user_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadApplicantDocumentPayload {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_name: String,
    pub document_type: DocumentType,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_data: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub file_type: String,
    #[validate(range(min = 1, message = "File size must be greater than zero"))]
    pub file_size: i64,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub applicant_name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub applicant_email: Option<String>,
}

/// Input of a document insert, owner already resolved.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub document_type: DocumentType,
    pub file_data: String,
    pub file_type: String,
    pub file_size: i64,
    pub owner: DocumentOwner,
}

/// Strips a `data:...;base64,` prefix if the client sent a full data URL.
pub fn strip_data_url(data: String) -> String {
    match data.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
        Some((_, payload)) => payload.to_string(),
        None => data,
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeDocumentFilter {
    pub document_type: Option<DocumentType>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ApplicantDocumentFilter {
    pub document_type: Option<DocumentType>,
    /// Case-insensitive substring match.
    pub applicant_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn row(file_data: &str, file_size: i64) -> DocumentRow {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DocumentRow {
            id: 1,
            file_name: "passport.pdf".into(),
            document_type: DocumentType::IdentificationDocs,
            file_data: file_data.into(),
            file_type: "application/pdf".into(),
            file_size,
            user_id: Some(7),
            applicant_name: None,
            applicant_email: None,
            created_at: ts,
            user_first_name: Some("Grace".into()),
            user_last_name: Some("Hopper".into()),
            user_email: Some("grace@example.com".into()),
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 2)]
    #[case(3, 4)]
    #[case(1000, 1334)]
    fn expected_length_is_ceil_of_four_thirds(#[case] size: i64, #[case] expected: i128) {
        assert_eq!(expected_base64_len(size), expected);
    }

    #[test]
    fn ninety_percent_is_the_cutoff() {
        // 1000 bytes -> 1334 expected; 90% = 1200.6
        assert!(ensure_intact(1201, 1000).is_ok());
        assert!(matches!(ensure_intact(1200, 1000), Err(AppError::CorruptedDocument)));
        assert!(ensure_intact(1334, 1000).is_ok());
    }

    #[test]
    fn absurd_declared_size_reads_as_corrupted() {
        assert_eq!(expected_base64_len(i64::MAX), (i128::from(i64::MAX) * 4 + 2) / 3);
        assert!(matches!(
            ensure_intact(16, 4_000_000_000_000_000_000),
            Err(AppError::CorruptedDocument)
        ));
        assert!(matches!(ensure_intact(16, i64::MAX), Err(AppError::CorruptedDocument)));
    }

    #[test]
    fn detail_serves_a_data_url() {
        let detail = DocumentDetail::from_row(row("JVBERi0xLjQK", 9)).unwrap();
        assert_eq!(detail.file_data, "data:application/pdf;base64,JVBERi0xLjQK");
        assert_eq!(detail.owner, DocumentOwner::Employee { user_id: 7 });
        assert_eq!(detail.owner_name.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn truncated_payload_is_not_served() {
        let result = DocumentDetail::from_row(row("JVBE", 1000));
        assert!(matches!(result, Err(AppError::CorruptedDocument)));
    }

    #[test]
    fn applicant_owner_maps_to_columns() {
        let owner = DocumentOwner::Applicant { name: "Jo".into(), email: None };
        assert_eq!(owner.into_columns(), (None, Some("Jo".into()), None));
    }

    #[test]
    fn data_url_prefix_is_stripped_on_upload() {
        assert_eq!(strip_data_url("data:image/png;base64,AAAA".into()), "AAAA");
        assert_eq!(strip_data_url("AAAA".into()), "AAAA");
    }

    #[test]
    fn document_type_labels() {
        let json = serde_json::to_string(&DocumentType::RightToWorkCheck).unwrap();
        assert_eq!(json, "\"Right to Work Check\"");
    }
}
