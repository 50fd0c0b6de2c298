pub mod attendance;
pub mod auth;
pub mod company_profile;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod leaves;
pub mod roles;
pub mod users;
