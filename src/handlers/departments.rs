// src/handlers/departments.rs

use axum::extract::State;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath}, response::ApiResponse},
    config::AppState,
    models::{
        department::{CreateDepartmentPayload, Department, UpdateDepartmentPayload},
        user::UpdateStatusPayload,
    },
};

pub async fn create(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateDepartmentPayload>,
) -> Result<ApiResponse<Department>, AppError> {
    payload.validate()?;

    let department = app_state.department_service.create(&payload).await?;

    Ok(ApiResponse::created(department).with_message("Department created successfully"))
}

pub async fn list(State(app_state): State<AppState>) -> Result<ApiResponse<Vec<Department>>, AppError> {
    let departments = app_state.department_service.list().await?;
    Ok(ApiResponse::ok(departments))
}

pub async fn get(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Department>, AppError> {
    let department = app_state.department_service.get(id).await?;
    Ok(ApiResponse::ok(department))
}

pub async fn update(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateDepartmentPayload>,
) -> Result<ApiResponse<Department>, AppError> {
    payload.validate()?;

    let department = app_state.department_service.update(id, &payload).await?;

    Ok(ApiResponse::ok(department).with_message("Department updated successfully"))
}

pub async fn set_status(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateStatusPayload>,
) -> Result<ApiResponse<Department>, AppError> {
    let department = app_state.department_service.set_status(id, payload.status).await?;
    Ok(ApiResponse::ok(department).with_message("Department status updated successfully"))
}

pub async fn delete(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.department_service.delete(id).await?;
    Ok(ApiResponse::message("Department deleted successfully"))
}
