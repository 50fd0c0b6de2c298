// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, extract::AppJson, response::ApiResponse},
    config::AppState,
    models::auth::{
        AuthResponse, ForgotPasswordPayload, ForgotPasswordResponse, LoginUserPayload,
        ResetPasswordPayload, VerifyResetTokenPayload, VerifyResetTokenResponse,
    },
};

// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Session token (8 h), top-level `token`", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse::new(token)))
}

// POST /api/forgot-password
#[utoipa::path(
    post,
    path = "/api/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Reset token (15 min), top-level `resetToken`", body = ForgotPasswordResponse),
        (status = 404, description = "User not found with this email")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<ForgotPasswordPayload>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    payload.validate()?;

    let reset_token = app_state.auth_service.forgot_password(&payload.email).await?;

    Ok(Json(ForgotPasswordResponse::new(reset_token)))
}

// POST /api/reset-password
#[utoipa::path(
    post,
    path = "/api/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Missing fields, mismatch or bad token")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordPayload>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.auth_service.reset_password(&payload).await?;
    Ok(ApiResponse::message("Password has been reset successfully"))
}

// POST /api/verify-reset-token
#[utoipa::path(
    post,
    path = "/api/verify-reset-token",
    tag = "Auth",
    request_body = VerifyResetTokenPayload,
    responses(
        (status = 200, description = "Token is valid", body = VerifyResetTokenResponse),
        (status = 400, description = "Invalid or expired reset token")
    )
)]
pub async fn verify_reset_token(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<VerifyResetTokenPayload>,
) -> Result<ApiResponse<VerifyResetTokenResponse>, AppError> {
    payload.validate()?;

    let email = app_state.auth_service.verify_reset_token(&payload.reset_token).await?;

    Ok(ApiResponse::ok(VerifyResetTokenResponse { email }))
}
