// src/handlers/users.rs

use axum::extract::State;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath}, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::{
        CreateUserPayload, UpdatePasswordPayload, UpdateStatusPayload, UpdateUserPayload, User,
        UserWithDepartment,
    },
};

// POST /api/users (public self-registration)
pub async fn create(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateUserPayload>,
) -> Result<ApiResponse<User>, AppError> {
    payload.validate()?;

    let user = app_state.user_service.create(&payload).await?;

    Ok(ApiResponse::created(user).with_message("User created successfully"))
}

pub async fn list(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<UserWithDepartment>>, AppError> {
    let users = app_state.user_service.list().await?;
    Ok(ApiResponse::ok(users))
}

pub async fn get(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<UserWithDepartment>, AppError> {
    let user = app_state.user_service.get(id).await?;
    Ok(ApiResponse::ok(user))
}

// GET /api/users/department/{department_id}
pub async fn list_by_department(
    State(app_state): State<AppState>,
    AppPath(department_id): AppPath<i32>,
) -> Result<ApiResponse<Vec<UserWithDepartment>>, AppError> {
    let users = app_state.user_service.list_by_department(department_id).await?;
    Ok(ApiResponse::ok(users))
}

pub async fn update(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateUserPayload>,
) -> Result<ApiResponse<User>, AppError> {
    payload.validate()?;

    let user = app_state.user_service.update(id, &payload).await?;

    Ok(ApiResponse::ok(user).with_message("User updated successfully"))
}

pub async fn set_status(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateStatusPayload>,
) -> Result<ApiResponse<User>, AppError> {
    let user = app_state.user_service.set_status(id, payload.status).await?;
    Ok(ApiResponse::ok(user).with_message("User status updated successfully"))
}

pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdatePasswordPayload>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;

    app_state.user_service.change_password(&caller, id, &payload).await?;

    Ok(ApiResponse::message("Password updated successfully"))
}

pub async fn delete(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.user_service.delete(id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "The caller's user record", body = UserWithDepartment),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("api_jwt" = []))
)]
pub async fn profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<ApiResponse<UserWithDepartment>, AppError> {
    let user = app_state.user_service.get(caller.id).await?;
    Ok(ApiResponse::ok(user))
}
