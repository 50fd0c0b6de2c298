// src/handlers/attendance.rs

use axum::extract::State;

use crate::{
    common::{error::AppError, extract::AppQuery, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::attendance::{
        Attendance, AttendanceHistory, AttendanceStatistics, AttendanceStatusView, HistoryQuery,
        StatisticsQuery,
    },
};

// POST /api/attendance/clock-in
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    tag = "Attendance",
    responses(
        (status = 201, description = "Clocked in", body = Attendance),
        (status = 400, description = "Already clocked in, or already clocked out today")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_in(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<ApiResponse<Attendance>, AppError> {
    let attendance = app_state.attendance_service.clock_in(caller.id).await?;
    Ok(ApiResponse::created(attendance).with_message("Clocked in successfully"))
}

// POST /api/attendance/clock-out
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    tag = "Attendance",
    responses(
        (status = 200, description = "Clocked out; totalHours computed", body = Attendance),
        (status = 400, description = "You are not clocked in today")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_out(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<ApiResponse<Attendance>, AppError> {
    let attendance = app_state.attendance_service.clock_out(caller.id).await?;
    Ok(ApiResponse::ok(attendance).with_message("Clocked out successfully"))
}

// GET /api/attendance/status
#[utoipa::path(
    get,
    path = "/api/attendance/status",
    tag = "Attendance",
    responses((status = 200, description = "Today's attendance state", body = AttendanceStatusView)),
    security(("api_jwt" = []))
)]
pub async fn current_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> Result<ApiResponse<AttendanceStatusView>, AppError> {
    let status = app_state.attendance_service.current_status(caller.id).await?;
    Ok(ApiResponse::ok(status))
}

// GET /api/attendance/history
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    tag = "Attendance",
    params(HistoryQuery),
    responses((status = 200, description = "Paginated history, newest first", body = AttendanceHistory)),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> Result<ApiResponse<AttendanceHistory>, AppError> {
    let history = app_state.attendance_service.history(&caller, &query).await?;
    Ok(ApiResponse::ok(history))
}

// GET /api/attendance/statistics
#[utoipa::path(
    get,
    path = "/api/attendance/statistics",
    tag = "Attendance",
    params(StatisticsQuery),
    responses((status = 200, description = "Hour totals", body = AttendanceStatistics)),
    security(("api_jwt" = []))
)]
pub async fn statistics(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    AppQuery(query): AppQuery<StatisticsQuery>,
) -> Result<ApiResponse<AttendanceStatistics>, AppError> {
    let stats = app_state.attendance_service.statistics(&caller, &query).await?;
    Ok(ApiResponse::ok(stats))
}
