pub mod attendance;
pub mod auth;
pub mod company_profile;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub mod role;
pub mod user;
