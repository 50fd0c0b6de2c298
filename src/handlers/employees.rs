// src/handlers/employees.rs

use axum::extract::State;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath, AppQuery}, response::ApiResponse},
    config::AppState,
    models::{
        employee::{
            CreateEmployeePayload, DashboardStats, Employee, EmployeeListItem, EmployeeSearchQuery,
            UpdateEmployeePayload,
        },
        user::AvailableUser,
    },
};

pub async fn list(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<EmployeeListItem>>, AppError> {
    let employees = app_state.employee_service.list().await?;
    Ok(ApiResponse::ok(employees))
}

pub async fn get(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<EmployeeListItem>, AppError> {
    let employee = app_state.employee_service.get(id).await?;
    Ok(ApiResponse::ok(employee))
}

pub async fn create(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateEmployeePayload>,
) -> Result<ApiResponse<Employee>, AppError> {
    payload.validate()?;

    let employee = app_state.employee_service.create(&payload).await?;

    Ok(ApiResponse::created(employee).with_message("Employee created successfully"))
}

pub async fn update(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateEmployeePayload>,
) -> Result<ApiResponse<Employee>, AppError> {
    payload.validate()?;

    let employee = app_state.employee_service.update(id, &payload).await?;

    Ok(ApiResponse::ok(employee).with_message("Employee updated successfully"))
}

pub async fn delete(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.employee_service.delete(id).await?;
    Ok(ApiResponse::message("Employee deleted successfully"))
}

pub async fn list_by_department(
    State(app_state): State<AppState>,
    AppPath(department_id): AppPath<i32>,
) -> Result<ApiResponse<Vec<EmployeeListItem>>, AppError> {
    let employees = app_state.employee_service.list_by_department(department_id).await?;
    Ok(ApiResponse::ok(employees))
}

// GET /api/employees/search?query=
pub async fn search(
    State(app_state): State<AppState>,
    AppQuery(params): AppQuery<EmployeeSearchQuery>,
) -> Result<ApiResponse<Vec<EmployeeListItem>>, AppError> {
    let employees = app_state.employee_service.search(&params.query).await?;
    Ok(ApiResponse::ok(employees))
}

pub async fn available_users(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<AvailableUser>>, AppError> {
    let users = app_state.employee_service.available_users().await?;
    Ok(ApiResponse::ok(users))
}

pub async fn dashboard(State(app_state): State<AppState>) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = app_state.employee_service.dashboard().await?;
    Ok(ApiResponse::ok(stats))
}
