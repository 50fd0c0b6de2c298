// src/services/token.rs

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::{
        auth::{Claims, ResetClaims, TokenKind, RESET_TTL_MINUTES, SESSION_TTL_HOURS},
        user::UserWithDepartment,
    },
};

/// Issues and verifies the two kinds of signed tokens. Holds no connection,
/// so the auth middleware can verify without touching the database.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_session(&self, user: &UserWithDepartment, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            id: user.user.id,
            role: user.user.role,
            email: user.user.email.clone(),
            department: user.department_name.clone(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify_session(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    pub fn issue_reset(&self, user_id: i32, email: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = ResetClaims {
            user_id,
            email: email.to_string(),
            kind: TokenKind::PasswordReset,
            iat: now.timestamp() as usize,
            exp: (now + Duration::minutes(RESET_TTL_MINUTES)).timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify_reset(&self, token: &str) -> Result<ResetClaims, AppError> {
        let claims = decode::<ResetClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Validation("Invalid or expired reset token".into()))?;

        if claims.kind != TokenKind::PasswordReset {
            return Err(AppError::Validation("Invalid token type".into()));
        }
        Ok(claims)
    }
}
