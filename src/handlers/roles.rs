// src/handlers/roles.rs

use axum::extract::State;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::role::Role,
};

pub async fn list(State(app_state): State<AppState>) -> Result<ApiResponse<Vec<Role>>, AppError> {
    let roles = app_state.role_repo.list().await?;
    Ok(ApiResponse::ok(roles))
}
