// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AttendanceRepository, CompanyProfileRepository, DepartmentRepository, DocumentRepository,
        EmployeeRepository, LeaveRepository, RoleRepository, UserRepository,
    },
    services::{
        attendance_service::AttendanceService, auth::AuthService,
        company_profile_service::CompanyProfileService, department_service::DepartmentService,
        document_service::DocumentService, employee_service::EmployeeService,
        leave_service::LeaveService, token::TokenService, user_service::UserService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub max_body_bytes: usize,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let max_body_bytes = parse_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;

        Ok(Self { database_url, jwt_secret, bind_addr, max_connections, max_body_bytes })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub max_body_bytes: usize,

    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub department_service: DepartmentService,
    pub role_repo: RoleRepository,
    pub employee_service: EmployeeService,
    pub attendance_service: AttendanceService,
    pub leave_service: LeaveService,
    pub document_service: DocumentService,
    pub company_profile_service: CompanyProfileService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("Database connection established");

        Ok(Self::from_parts(db_pool, config))
    }

    /// Wires the dependency graph over an existing pool.
    pub fn from_parts(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let department_repo = DepartmentRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());

        let tokens = TokenService::new(&config.jwt_secret);

        Self {
            auth_service: AuthService::new(user_repo.clone(), tokens.clone()),
            user_service: UserService::new(user_repo.clone()),
            department_service: DepartmentService::new(department_repo.clone()),
            role_repo: RoleRepository::new(db_pool.clone()),
            employee_service: EmployeeService::new(
                employee_repo,
                user_repo.clone(),
                department_repo,
            ),
            attendance_service: AttendanceService::new(AttendanceRepository::new(db_pool.clone())),
            leave_service: LeaveService::new(LeaveRepository::new(db_pool.clone()), db_pool.clone()),
            document_service: DocumentService::new(DocumentRepository::new(db_pool.clone()), user_repo),
            company_profile_service: CompanyProfileService::new(
                CompanyProfileRepository::new(db_pool.clone()),
                db_pool.clone(),
            ),
            tokens,
            max_body_bytes: config.max_body_bytes,
            db_pool,
        }
    }
}
