// src/db/user_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::user::{AvailableUser, CreateUserPayload, UpdateUserPayload, User, UserWithDepartment},
};

const SELECT_WITH_DEPARTMENT: &str = r#"
    SELECT u.*, d.name AS department_name
    FROM users u
    LEFT JOIN departments d ON d.id = u.department_id
"#;

// Every interaction with the 'users' table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Login needs the hash and the department name in one go
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserWithDepartment>, AppError> {
        let sql = format!("{} WHERE u.email = $1", SELECT_WITH_DEPARTMENT);
        let user = sqlx::query_as::<_, UserWithDepartment>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_with_department(&self, id: i32) -> Result<Option<UserWithDepartment>, AppError> {
        let sql = format!("{} WHERE u.id = $1", SELECT_WITH_DEPARTMENT);
        let user = sqlx::query_as::<_, UserWithDepartment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<UserWithDepartment>, AppError> {
        let sql = format!("{} ORDER BY u.created_at DESC", SELECT_WITH_DEPARTMENT);
        let users = sqlx::query_as::<_, UserWithDepartment>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn list_by_department(&self, department_id: i32) -> Result<Vec<UserWithDepartment>, AppError> {
        let sql = format!(
            "{} WHERE u.department_id = $1 ORDER BY u.first_name",
            SELECT_WITH_DEPARTMENT
        );
        let users = sqlx::query_as::<_, UserWithDepartment>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Active users as picker options, for the document upload form
    pub async fn list_active_options(&self) -> Result<Vec<AvailableUser>, AppError> {
        let users = sqlx::query_as::<_, AvailableUser>(
            r#"
            SELECT email AS label,
                   id AS value,
                   TRIM(first_name || ' ' || COALESCE(last_name, '')) AS name
            FROM users
            WHERE status = TRUE
            ORDER BY first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn create(
        &self,
        payload: &CreateUserPayload,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                first_name, middle_name, last_name, gender, date_of_birth,
                contact_number, role, username, email, password_hash,
                status, profile_picture, department_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&payload.first_name)
        .bind(&payload.middle_name)
        .bind(&payload.last_name)
        .bind(payload.gender)
        .bind(payload.date_of_birth)
        .bind(&payload.contact_number)
        .bind(payload.role)
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(password_hash)
        .bind(payload.status.unwrap_or(true))
        .bind(&payload.profile_picture)
        .bind(payload.department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    // Partial update: NULL parameters keep the stored value
    pub async fn update(
        &self,
        id: i32,
        changes: &UpdateUserPayload,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name      = COALESCE($2, first_name),
                middle_name     = COALESCE($3, middle_name),
                last_name       = COALESCE($4, last_name),
                gender          = COALESCE($5, gender),
                date_of_birth   = COALESCE($6, date_of_birth),
                contact_number  = COALESCE($7, contact_number),
                role            = COALESCE($8, role),
                username        = COALESCE($9, username),
                email           = COALESCE($10, email),
                password_hash   = COALESCE($11, password_hash),
                profile_picture = COALESCE($12, profile_picture),
                department_id   = COALESCE($13, department_id),
                updated_at      = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.middle_name)
        .bind(&changes.last_name)
        .bind(changes.gender)
        .bind(changes.date_of_birth)
        .bind(&changes.contact_number)
        .bind(changes.role)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(password_hash)
        .bind(&changes.profile_picture)
        .bind(changes.department_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    pub async fn set_status(&self, id: i32, status: bool) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn set_password(&self, id: i32, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
