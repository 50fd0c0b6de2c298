// src/db/leave_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::leave::{Leave, LeaveRecord, LeaveRequest, LeaveSample, LeaveStatus, LeaveType},
};

const SELECT_RECORD: &str = r#"
    SELECT l.*,
           u.first_name  AS employee_first_name,
           u.last_name   AS employee_last_name,
           u.email       AS employee_email,
           ap.first_name AS approver_first_name,
           ap.last_name  AS approver_last_name
    FROM leaves l
    JOIN users u ON u.id = l.user_id
    LEFT JOIN users ap ON ap.id = l.approved_by
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- runs inside the caller's transaction ---

    pub async fn list_for_user<'e, E>(&self, executor: E, user_id: i32) -> Result<Vec<Leave>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert<'e, E>(&self, executor: E, user_id: i32, request: &LeaveRequest) -> Result<Leave, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Leave>(
            r#"
            INSERT INTO leaves (user_id, leave_type, start_date, end_date, total_days, comment, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'Pending')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(request.leave_type)
        .bind(request.range.start())
        .bind(request.range.end())
        .bind(request.range.total_days())
        .bind(&request.comment)
        .fetch_one(executor)
        .await
        .map_err(map_constraint_violation)
    }

    /// Rewrites a leave that is still Pending; `None` if it no longer is.
    pub async fn update_pending<'e, E>(
        &self,
        executor: E,
        id: i32,
        request: &LeaveRequest,
    ) -> Result<Option<Leave>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Leave>(
            r#"
            UPDATE leaves SET
                leave_type = $2,
                start_date = $3,
                end_date   = $4,
                total_days = $5,
                comment    = $6,
                updated_at = NOW()
            WHERE id = $1 AND status = 'Pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.leave_type)
        .bind(request.range.start())
        .bind(request.range.end())
        .bind(request.range.total_days())
        .bind(&request.comment)
        .fetch_optional(executor)
        .await
        .map_err(map_constraint_violation)
    }

    // --- pool ---

    pub async fn find(&self, id: i32) -> Result<Option<Leave>, AppError> {
        let row = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_record(&self, id: i32) -> Result<Option<LeaveRecord>, AppError> {
        let sql = format!("{} WHERE l.id = $1", SELECT_RECORD);
        let row = sqlx::query_as::<_, LeaveRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        user_id: Option<i32>,
        status: Option<LeaveStatus>,
        leave_type: Option<LeaveType>,
    ) -> Result<Vec<LeaveRecord>, AppError> {
        let sql = format!(
            r#"{}
            WHERE ($1::int IS NULL OR l.user_id = $1)
              AND ($2::leave_status IS NULL OR l.status = $2)
              AND ($3::leave_type IS NULL OR l.leave_type = $3)
            ORDER BY l.created_at DESC
            "#,
            SELECT_RECORD
        );
        let rows = sqlx::query_as::<_, LeaveRecord>(&sql)
            .bind(user_id)
            .bind(status)
            .bind(leave_type)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Pending -> Approved/Rejected. `None` when the leave is missing or
    /// already decided.
    pub async fn decide(
        &self,
        id: i32,
        status: LeaveStatus,
        approver_id: i32,
        decided_at: DateTime<Utc>,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Leave>, AppError> {
        let row = sqlx::query_as::<_, Leave>(
            r#"
            UPDATE leaves SET
                status           = $2,
                approved_by      = $3,
                approved_at      = $4,
                rejection_reason = $5,
                updated_at       = NOW()
            WHERE id = $1 AND status = 'Pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(approver_id)
        .bind(decided_at)
        .bind(rejection_reason)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_pending(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leaves WHERE id = $1 AND status = 'Pending'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn samples(&self, user_id: Option<i32>) -> Result<Vec<LeaveSample>, AppError> {
        let rows = sqlx::query_as::<_, LeaveSample>(
            r#"
            SELECT leave_type, status, total_days
            FROM leaves
            WHERE ($1::int IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
