// src/handlers/documents.rs

use axum::extract::State;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath, AppQuery}, response::ApiResponse},
    config::AppState,
    models::{
        document::{
            ApplicantDocumentFilter, DocumentDetail, DocumentSummary, EmployeeDocumentFilter,
            UploadApplicantDocumentPayload, UploadEmployeeDocumentPayload,
        },
        user::AvailableUser,
    },
};

// POST /api/documents/employee
#[utoipa::path(
    post,
    path = "/api/documents/employee",
    tag = "Documents",
    request_body = UploadEmployeeDocumentPayload,
    responses(
        (status = 201, description = "Document stored", body = DocumentSummary),
        (status = 400, description = "All fields are required"),
        (status = 404, description = "User not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_employee_document(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<UploadEmployeeDocumentPayload>,
) -> Result<ApiResponse<DocumentSummary>, AppError> {
    payload.validate()?;

    let document = app_state.document_service.upload_for_employee(payload).await?;

    Ok(ApiResponse::created(document).with_message("Document uploaded successfully"))
}

// POST /api/documents/applicant
#[utoipa::path(
    post,
    path = "/api/documents/applicant",
    tag = "Documents",
    request_body = UploadApplicantDocumentPayload,
    responses(
        (status = 201, description = "Document stored", body = DocumentSummary),
        (status = 400, description = "All fields are required")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_applicant_document(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<UploadApplicantDocumentPayload>,
) -> Result<ApiResponse<DocumentSummary>, AppError> {
    payload.validate()?;

    let document = app_state.document_service.upload_for_applicant(payload).await?;

    Ok(ApiResponse::created(document).with_message("Document uploaded successfully"))
}

// GET /api/documents/employee
#[utoipa::path(
    get,
    path = "/api/documents/employee",
    tag = "Documents",
    params(EmployeeDocumentFilter),
    responses((status = 200, description = "Active employee documents, without data", body = [DocumentSummary])),
    security(("api_jwt" = []))
)]
pub async fn list_employee_documents(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<EmployeeDocumentFilter>,
) -> Result<ApiResponse<Vec<DocumentSummary>>, AppError> {
    let documents = app_state.document_service.list_employee_documents(&filter).await?;
    Ok(ApiResponse::ok(documents))
}

// GET /api/documents/applicant
#[utoipa::path(
    get,
    path = "/api/documents/applicant",
    tag = "Documents",
    params(ApplicantDocumentFilter),
    responses((status = 200, description = "Active applicant documents, without data", body = [DocumentSummary])),
    security(("api_jwt" = []))
)]
pub async fn list_applicant_documents(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<ApplicantDocumentFilter>,
) -> Result<ApiResponse<Vec<DocumentSummary>>, AppError> {
    let documents = app_state.document_service.list_applicant_documents(&filter).await?;
    Ok(ApiResponse::ok(documents))
}

// GET /api/documents/{id}
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document with its data URL", body = DocumentDetail),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Document data is corrupted or incomplete")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<DocumentDetail>, AppError> {
    let document = app_state.document_service.get(id).await?;
    Ok(ApiResponse::ok(document))
}

// DELETE /api/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document marked as deleted"),
        (status = 404, description = "Document not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.document_service.delete(id).await?;
    Ok(ApiResponse::message("Document deleted successfully"))
}

// GET /api/documents/users/available
pub async fn available_users(
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Vec<AvailableUser>>, AppError> {
    let users = app_state.document_service.available_users().await?;
    Ok(ApiResponse::ok(users))
}
