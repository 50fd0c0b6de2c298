pub mod attendance_service;
pub mod auth;
pub mod company_profile_service;
pub mod department_service;
pub mod document_service;
pub mod employee_service;
pub mod leave_service;
pub mod token;
pub mod user_service;
