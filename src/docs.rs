// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,
        handlers::auth::verify_reset_token,
        handlers::users::profile,

        // --- Attendance ---
        handlers::attendance::clock_in,
        handlers::attendance::clock_out,
        handlers::attendance::current_status,
        handlers::attendance::history,
        handlers::attendance::statistics,

        // --- Leaves ---
        handlers::leaves::apply,
        handlers::leaves::list,
        handlers::leaves::statistics,
        handlers::leaves::get,
        handlers::leaves::update,
        handlers::leaves::delete,
        handlers::leaves::approve,
        handlers::leaves::reject,

        // --- Documents ---
        handlers::documents::upload_employee_document,
        handlers::documents::upload_applicant_document,
        handlers::documents::list_employee_documents,
        handlers::documents::list_applicant_documents,
        handlers::documents::get_document,
        handlers::documents::delete_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::ForgotPasswordPayload,
            models::auth::ForgotPasswordResponse,
            models::auth::ResetPasswordPayload,
            models::auth::VerifyResetTokenPayload,
            models::auth::VerifyResetTokenResponse,

            // --- Users ---
            models::user::UserRole,
            models::user::Gender,
            models::user::User,
            models::user::UserWithDepartment,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::UpdatePasswordPayload,
            models::user::UpdateStatusPayload,
            models::user::AvailableUser,

            // --- Departments & Roles ---
            models::department::Department,
            models::department::CreateDepartmentPayload,
            models::department::UpdateDepartmentPayload,
            models::role::Role,

            // --- Employees ---
            models::employee::EmployeeStatus,
            models::employee::Employee,
            models::employee::EmployeeListItem,
            models::employee::CreateEmployeePayload,
            models::employee::UpdateEmployeePayload,
            models::employee::DashboardStats,

            // --- Attendance ---
            models::attendance::AttendanceStatus,
            models::attendance::Attendance,
            models::attendance::AttendanceRecord,
            models::attendance::EmployeeBrief,
            models::attendance::Pagination,
            models::attendance::AttendanceHistory,
            models::attendance::AttendanceStatusView,
            models::attendance::AttendanceStatistics,

            // --- Leaves ---
            models::leave::LeaveType,
            models::leave::LeaveStatus,
            models::leave::Leave,
            models::leave::LeaveRecord,
            models::leave::LeavePayload,
            models::leave::RejectLeavePayload,
            models::leave::StatusCount,
            models::leave::LeaveDays,
            models::leave::LeaveStatistics,

            // --- Documents ---
            models::document::DocumentType,
            models::document::DocumentStatus,
            models::document::DocumentOwner,
            models::document::DocumentSummary,
            models::document::DocumentDetail,
            models::document::UploadEmployeeDocumentPayload,
            models::document::UploadApplicantDocumentPayload,

            // --- Company profile ---
            models::company_profile::CompanyProfile,
            models::company_profile::RegistrationDetail,
            models::company_profile::CompanyProfileView,
            models::company_profile::RegistrationDetailInput,
            models::company_profile::SaveCompanyProfilePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login, password reset and the caller's profile"),
        (name = "Attendance", description = "Clock in/out, history and hour statistics"),
        (name = "Leaves", description = "Leave requests and their approval"),
        (name = "Documents", description = "Employee and applicant documents")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_operation_is_under_api() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.keys().all(|path| path.starts_with("/api/")));
        assert!(doc.paths.paths.contains_key("/api/leaves/{id}/reject"));
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
