// src/db/attendance_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::attendance::{Attendance, AttendanceRecord, AttendanceSample},
};

const SELECT_RECORD: &str = r#"
    SELECT a.*, u.first_name, u.last_name, u.email
    FROM attendances a
    JOIN users u ON u.id = a.user_id
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the day's row unless one already exists; `None` means the
    /// unique `(user_id, work_date)` key was taken.
    pub async fn insert_if_absent(
        &self,
        user_id: i32,
        clock_in_time: DateTime<Utc>,
        work_date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendances (user_id, clock_in_time, status, work_date)
            VALUES ($1, $2, 'Clocked In', $3)
            ON CONFLICT (user_id, work_date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(clock_in_time)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_for_day(&self, user_id: i32, work_date: NaiveDate) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendances WHERE user_id = $1 AND work_date = $2",
        )
        .bind(user_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_record_for_day(
        &self,
        user_id: i32,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let sql = format!("{} WHERE a.user_id = $1 AND a.work_date = $2", SELECT_RECORD);
        let row = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(user_id)
            .bind(work_date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Clocked In -> Clocked Out. Only succeeds if the row is still open.
    pub async fn close(
        &self,
        id: i32,
        clock_out_time: DateTime<Utc>,
        total_hours: Decimal,
    ) -> Result<Option<Attendance>, AppError> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendances SET
                clock_out_time = $2,
                total_hours    = $3,
                status         = 'Clocked Out',
                updated_at     = NOW()
            WHERE id = $1 AND status = 'Clocked In'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(clock_out_time)
        .bind(total_hours)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn history(
        &self,
        user_id: i32,
        window: Option<(NaiveDate, NaiveDate)>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let (from, to) = split(window);
        let sql = format!(
            r#"{}
            WHERE a.user_id = $1
              AND ($2::date IS NULL OR a.work_date BETWEEN $2 AND $3)
            ORDER BY a.work_date DESC, a.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            SELECT_RECORD
        );
        let rows = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self, user_id: i32, window: Option<(NaiveDate, NaiveDate)>) -> Result<i64, AppError> {
        let (from, to) = split(window);
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendances
            WHERE user_id = $1
              AND ($2::date IS NULL OR work_date BETWEEN $2 AND $3)
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn samples(
        &self,
        user_id: i32,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<AttendanceSample>, AppError> {
        let (from, to) = split(window);
        let rows = sqlx::query_as::<_, AttendanceSample>(
            r#"
            SELECT work_date, status, total_hours, clock_in_time
            FROM attendances
            WHERE user_id = $1
              AND ($2::date IS NULL OR work_date BETWEEN $2 AND $3)
            ORDER BY work_date
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn split(window: Option<(NaiveDate, NaiveDate)>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match window {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    }
}
