// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::ResetPasswordPayload,
    services::token::TokenService,
};

const MIN_PASSWORD_LEN: usize = 6;

// bcrypt is CPU-bound; keep it off the async workers
pub(crate) async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {}", e))??;
    Ok(hashed)
}

pub(crate) async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;
    Ok(valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, tokens: TokenService) -> Self {
        Self { user_repo, tokens }
    }

    // Same error for unknown email and wrong password
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.user.id, "user logged in");
        self.tokens.issue_session(&user, Utc::now())
    }

    /// Returns the reset token itself; delivering it is the client's concern.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound("User not found with this email"))?;

        tracing::info!(user_id = user.user.id, "password reset requested");
        self.tokens.issue_reset(user.user.id, &user.user.email, Utc::now())
    }

    pub async fn reset_password(&self, payload: &ResetPasswordPayload) -> Result<(), AppError> {
        check_reset_fields(payload)?;

        let claims = self.tokens.verify_reset(&payload.reset_token)?;
        if claims.email != payload.email {
            return Err(AppError::Validation("Email does not match reset token".into()));
        }

        let user = self
            .user_repo
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        let password_hash = hash_password(&payload.new_password).await?;
        self.user_repo.set_password(user.id, &password_hash).await?;

        tracing::info!(user_id = user.id, "password reset completed");
        Ok(())
    }

    pub async fn verify_reset_token(&self, token: &str) -> Result<String, AppError> {
        let claims = self.tokens.verify_reset(token)?;
        let user = self
            .user_repo
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;
        Ok(user.email)
    }
}

fn check_reset_fields(payload: &ResetPasswordPayload) -> Result<(), AppError> {
    let fields = [
        &payload.email,
        &payload.new_password,
        &payload.confirm_password,
        &payload.reset_token,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if payload.new_password != payload.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    if payload.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn payload(email: &str, new: &str, confirm: &str, token: &str) -> ResetPasswordPayload {
        ResetPasswordPayload {
            email: email.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
            reset_token: token.into(),
        }
    }

    #[rstest]
    #[case(payload("", "secret1", "secret1", "t"), "All fields are required")]
    #[case(payload("a@b.c", "secret1", "secret2", "t"), "Passwords do not match")]
    #[case(payload("a@b.c", "abc", "abc", "t"), "Password must be at least 6 characters long")]
    fn reset_fields_are_checked_in_order(#[case] p: ResetPasswordPayload, #[case] message: &str) {
        assert_eq!(check_reset_fields(&p).unwrap_err().to_string(), message);
    }

    #[test]
    fn complete_reset_payload_passes() {
        assert!(check_reset_fields(&payload("a@b.c", "secret1", "secret1", "t")).is_ok());
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("hunter22").await.unwrap();
        assert!(verify_password("hunter22", &hashed).await.unwrap());
        assert!(!verify_password("hunter23", &hashed).await.unwrap());
    }
}
