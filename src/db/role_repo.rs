// src/db/role_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::role::Role};

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }
}
