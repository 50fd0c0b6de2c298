// src/db/department_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::department::Department,
};

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(departments)
    }

    pub async fn list_active_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM departments WHERE status = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(department)
    }

    /// Another department already using `name`, ignoring `except_id`.
    pub async fn name_taken(&self, name: &str, except_id: Option<i32>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM departments
                WHERE name = $1 AND ($2::int IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        status: bool,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, description, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
        status: Option<bool>,
    ) -> Result<Option<Department>, AppError> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                status      = COALESCE($4, status),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
