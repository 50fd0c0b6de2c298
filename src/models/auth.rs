// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::UserRole;

pub const SESSION_TTL_HOURS: i64 = 8;
pub const RESET_TTL_MINUTES: i64 = 15;

// Login payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Please provide a valid email address"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Login reply: the token sits at the top level of the body, not under `data`
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn new(token: String) -> Self {
        Self { success: true, token }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub reset_token: String,
}

impl ForgotPasswordResponse {
    pub fn new(reset_token: String) -> Self {
        Self {
            success: true,
            message: "Password reset token generated".into(),
            reset_token,
        }
    }
}

// Every field is checked by the service so the client gets one message for
// "something is missing", same as the web form expects.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub reset_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResetTokenPayload {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub reset_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResetTokenResponse {
    pub email: String,
}

// --- JWT CLAIMS ---

/// Session token payload. `department` is the department name at login time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: UserRole,
    pub email: String,
    pub department: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn is_system_admin(&self) -> bool {
        self.role == UserRole::SystemAdmin
    }

    /// Admins may act on anyone's rows, everyone else only on their own.
    pub fn can_act_for(&self, owner_id: i32) -> bool {
        self.is_system_admin() || self.id == owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    PasswordReset,
    #[serde(other)]
    Unknown,
}

/// Password-reset token payload. Its shape differs from `Claims` on purpose:
/// neither token decodes as the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetClaims {
    pub user_id: i32,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: i32, role: UserRole) -> Claims {
        Claims { id, role, email: "x@example.com".into(), department: None, iat: 0, exp: 0 }
    }

    #[test]
    fn only_owner_or_admin_can_act() {
        assert!(claims(3, UserRole::Employee).can_act_for(3));
        assert!(!claims(3, UserRole::Hr).can_act_for(4));
        assert!(claims(1, UserRole::SystemAdmin).can_act_for(4));
    }

    #[test]
    fn reset_claims_serialize_type_tag() {
        let reset = ResetClaims {
            user_id: 9,
            email: "x@example.com".into(),
            kind: TokenKind::PasswordReset,
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&reset).unwrap();
        assert_eq!(json["type"], "password_reset");
        assert_eq!(json["userId"], 9);
    }

    #[test]
    fn login_and_reset_tokens_sit_at_the_top_level() {
        let login = serde_json::to_value(AuthResponse::new("abc".into())).unwrap();
        assert_eq!(login, serde_json::json!({ "success": true, "token": "abc" }));

        let forgot = serde_json::to_value(ForgotPasswordResponse::new("xyz".into())).unwrap();
        assert_eq!(forgot["resetToken"], "xyz");
        assert_eq!(forgot["success"], true);
        assert!(forgot.get("data").is_none());
    }
}
