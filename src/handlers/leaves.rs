// src/handlers/leaves.rs

use axum::extract::State;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppJsonOrDefault, AppPath, AppQuery},
        response::ApiResponse,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{LeaveApprover, RequireRole},
    },
    models::leave::{Leave, LeaveFilter, LeavePayload, LeaveRecord, LeaveStatistics, RejectLeavePayload},
};

// POST /api/leaves
#[utoipa::path(
    post,
    path = "/api/leaves",
    tag = "Leaves",
    request_body = LeavePayload,
    responses(
        (status = 201, description = "Leave requested (Pending)", body = Leave),
        (status = 400, description = "Missing fields, bad range or overlapping leave")
    ),
    security(("api_jwt" = []))
)]
pub async fn apply(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppJson(payload): AppJson<LeavePayload>,
) -> Result<ApiResponse<Leave>, AppError> {
    let leave = app_state.leave_service.apply(caller.id, payload).await?;
    Ok(ApiResponse::created(leave).with_message("Leave application submitted successfully"))
}

// GET /api/leaves
#[utoipa::path(
    get,
    path = "/api/leaves",
    tag = "Leaves",
    params(LeaveFilter),
    responses((status = 200, description = "Own leaves, or everyone's for System Admin", body = [LeaveRecord])),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppQuery(filter): AppQuery<LeaveFilter>,
) -> Result<ApiResponse<Vec<LeaveRecord>>, AppError> {
    let leaves = app_state.leave_service.list(&caller, &filter).await?;
    Ok(ApiResponse::ok(leaves))
}

// GET /api/leaves/statistics
#[utoipa::path(
    get,
    path = "/api/leaves/statistics",
    tag = "Leaves",
    responses((status = 200, description = "Counts and approved days", body = LeaveStatistics)),
    security(("api_jwt" = []))
)]
pub async fn statistics(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<ApiResponse<LeaveStatistics>, AppError> {
    let stats = app_state.leave_service.statistics(&caller).await?;
    Ok(ApiResponse::ok(stats))
}

// GET /api/leaves/{id}
#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    tag = "Leaves",
    params(("id" = i32, Path, description = "Leave id")),
    responses(
        (status = 200, description = "Leave with applicant and approver", body = LeaveRecord),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Leave not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<LeaveRecord>, AppError> {
    let leave = app_state.leave_service.get(&caller, id).await?;
    Ok(ApiResponse::ok(leave))
}

// PUT /api/leaves/{id}
#[utoipa::path(
    put,
    path = "/api/leaves/{id}",
    tag = "Leaves",
    params(("id" = i32, Path, description = "Leave id")),
    request_body = LeavePayload,
    responses(
        (status = 200, description = "Leave updated", body = Leave),
        (status = 400, description = "Not pending, bad range or overlap"),
        (status = 403, description = "Not the owner")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<LeavePayload>,
) -> Result<ApiResponse<Leave>, AppError> {
    let leave = app_state.leave_service.update(&caller, id, payload).await?;
    Ok(ApiResponse::ok(leave).with_message("Leave updated successfully"))
}

// DELETE /api/leaves/{id}
#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    tag = "Leaves",
    params(("id" = i32, Path, description = "Leave id")),
    responses(
        (status = 200, description = "Leave deleted"),
        (status = 400, description = "Only pending leaves can be deleted")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.leave_service.delete(&caller, id).await?;
    Ok(ApiResponse::message("Leave deleted successfully"))
}

// PATCH /api/leaves/{id}/approve
#[utoipa::path(
    patch,
    path = "/api/leaves/{id}/approve",
    tag = "Leaves",
    params(("id" = i32, Path, description = "Leave id")),
    responses(
        (status = 200, description = "Leave approved", body = Leave),
        (status = 400, description = "Leave is not in pending status"),
        (status = 403, description = "Only System Admin can approve/reject leaves")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve(
    State(app_state): State<AppState>,
    admin: RequireRole<LeaveApprover>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<Leave>, AppError> {
    let leave = app_state.leave_service.approve(&admin.claims, id).await?;
    Ok(ApiResponse::ok(leave).with_message("Leave approved successfully"))
}

// PATCH /api/leaves/{id}/reject
#[utoipa::path(
    patch,
    path = "/api/leaves/{id}/reject",
    tag = "Leaves",
    params(("id" = i32, Path, description = "Leave id")),
    request_body = RejectLeavePayload,
    responses(
        (status = 200, description = "Leave rejected", body = Leave),
        (status = 400, description = "Rejection reason is required, or not pending"),
        (status = 403, description = "Only System Admin can approve/reject leaves")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject(
    State(app_state): State<AppState>,
    admin: RequireRole<LeaveApprover>,
    AppPath(id): AppPath<i32>,
    AppJsonOrDefault(payload): AppJsonOrDefault<RejectLeavePayload>,
) -> Result<ApiResponse<Leave>, AppError> {
    let leave = app_state.leave_service.reject(&admin.claims, id, &payload).await?;
    Ok(ApiResponse::ok(leave).with_message("Leave rejected successfully"))
}
