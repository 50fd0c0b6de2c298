// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Every failure a handler can produce. The display text is what the client reads
// in `message`; `code()` is the stable machine-readable part.
#[derive(Debug, Error)]
pub enum AppError {
    // --- 400: validation ---
    #[error("One or more fields are invalid")]
    InvalidFields(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Validation(String),

    #[error("End date must be after start date")]
    InvalidDateRange,

    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    // --- 400: conflicts and illegal transitions ---
    #[error("{0}")]
    Conflict(String),

    #[error("You are already clocked in today")]
    AlreadyClockedIn,

    #[error("You have already clocked out today. You cannot clock in again on the same day.")]
    AlreadyClockedOutToday,

    #[error("You are not clocked in today")]
    NotClockedIn,

    #[error("You have an overlapping leave request for these dates")]
    OverlappingLeave,

    #[error("{0}")]
    NotPending(&'static str),

    // --- 401 / 403 ---
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    // --- 404 ---
    #[error("{0}")]
    NotFound(&'static str),

    // --- 500 ---
    #[error("Document data is corrupted or incomplete")]
    CorruptedDocument,

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFields(_)
            | AppError::Validation(_)
            | AppError::InvalidDateRange
            | AppError::RejectionReasonRequired
            | AppError::Conflict(_)
            | AppError::AlreadyClockedIn
            | AppError::AlreadyClockedOutToday
            | AppError::NotClockedIn
            | AppError::OverlappingLeave
            | AppError::NotPending(_) => StatusCode::BAD_REQUEST,

            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,

            AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            AppError::NotFound(_) => StatusCode::NOT_FOUND,

            AppError::CorruptedDocument
            | AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Bcrypt(_)
            | AppError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidFields(_) | AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidDateRange => "INVALID_DATE_RANGE",
            AppError::RejectionReasonRequired => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::AlreadyClockedIn => "ALREADY_CLOCKED_IN",
            AppError::AlreadyClockedOutToday => "ALREADY_CLOCKED_OUT_TODAY",
            AppError::NotClockedIn => "NOT_CLOCKED_IN",
            AppError::OverlappingLeave => "OVERLAPPING_LEAVE",
            AppError::NotPending(_) => "NOT_PENDING",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MissingToken | AppError::InvalidToken => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CorruptedDocument => "CORRUPTED_DOCUMENT",
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Bcrypt(_)
            | AppError::Jwt(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::InvalidFields(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "success": false,
                "message": self.to_string(),
                "error": self.code(),
                "details": details,
            }));
            return (status, body).into_response();
        }

        // Internal failures are logged in full but never leaked to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal server error: {:?}", self);
            if matches!(self, AppError::CorruptedDocument) {
                self.to_string()
            } else {
                "An unexpected error occurred".to_string()
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": self.code(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::AlreadyClockedIn, StatusCode::BAD_REQUEST)]
    #[case(AppError::AlreadyClockedOutToday, StatusCode::BAD_REQUEST)]
    #[case(AppError::NotPending("Leave is not in pending status"), StatusCode::BAD_REQUEST)]
    #[case(AppError::Conflict("Department name must be unique".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::MissingToken, StatusCode::UNAUTHORIZED)]
    #[case(AppError::Forbidden("nope".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::NotFound("Leave not found"), StatusCode::NOT_FOUND)]
    #[case(AppError::CorruptedDocument, StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_each_category_to_its_status(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
    }

    #[tokio::test]
    async fn error_body_uses_the_envelope() {
        let response = AppError::RejectionReasonRequired.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Rejection reason is required");
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let bytes = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "An unexpected error occurred");
    }
}
