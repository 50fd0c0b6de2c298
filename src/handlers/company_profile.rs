// src/handlers/company_profile.rs

use axum::extract::State;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::AppJson, response::ApiResponse},
    config::AppState,
    models::company_profile::{CompanyProfileView, SaveCompanyProfilePayload},
};

// GET /api/company-profile (public; `data: null` until first save)
pub async fn get(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Option<CompanyProfileView>>, AppError> {
    let profile = app_state.company_profile_service.get().await?;
    Ok(ApiResponse::ok(profile))
}

pub async fn save(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<SaveCompanyProfilePayload>,
) -> Result<ApiResponse<CompanyProfileView>, AppError> {
    payload.validate()?;

    let profile = app_state.company_profile_service.save(&payload).await?;

    Ok(ApiResponse::ok(profile).with_message("Company profile saved successfully"))
}
