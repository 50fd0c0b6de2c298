pub mod user_repo;
pub use user_repo::UserRepository;
pub mod department_repo;
pub use department_repo::DepartmentRepository;
pub mod role_repo;
pub use role_repo::RoleRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod attendance_repo;
pub use attendance_repo::AttendanceRepository;
pub mod leave_repo;
pub use leave_repo::LeaveRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod company_profile_repo;
pub use company_profile_repo::CompanyProfileRepository;
