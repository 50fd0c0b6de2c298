// src/services/attendance_service.rs

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::AttendanceRepository,
    models::{
        attendance::{
            ensure_can_clock_in, hours_between, week_bounds, work_date_window, Attendance,
            AttendanceHistory, AttendanceStatistics, AttendanceStatus, AttendanceStatusView,
            HistoryQuery, Pagination, StatisticsQuery,
        },
        auth::Claims,
    },
};

/// Current instant and the server's local calendar date, which is what
/// "today" means for a work date.
fn clock() -> (DateTime<Utc>, NaiveDate) {
    (Utc::now(), Local::now().date_naive())
}

/// Admins may look at another user's attendance; everyone else sees their own.
fn target_user(caller: &Claims, requested: Option<i32>) -> i32 {
    match requested {
        Some(user_id) if caller.is_system_admin() => user_id,
        _ => caller.id,
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    repo: AttendanceRepository,
}

impl AttendanceService {
    pub fn new(repo: AttendanceRepository) -> Self {
        Self { repo }
    }

    pub async fn clock_in(&self, user_id: i32) -> Result<Attendance, AppError> {
        let (now, today) = clock();
        self.clock_in_at(user_id, now, today).await
    }

    pub async fn clock_in_at(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Attendance, AppError> {
        if let Some(created) = self.repo.insert_if_absent(user_id, now, today).await? {
            tracing::info!(user_id, work_date = %today, "clocked in");
            return Ok(created);
        }

        // The day's row already exists; its status says why we refuse.
        let existing = self.repo.find_for_day(user_id, today).await?;
        ensure_can_clock_in(existing.map(|a| a.status))?;

        Err(anyhow::anyhow!(
            "attendance row for user {} on {} vanished during clock-in",
            user_id,
            today
        )
        .into())
    }

    pub async fn clock_out(&self, user_id: i32) -> Result<Attendance, AppError> {
        let (now, today) = clock();
        self.clock_out_at(user_id, now, today).await
    }

    pub async fn clock_out_at(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Attendance, AppError> {
        let open = self
            .repo
            .find_for_day(user_id, today)
            .await?
            .filter(|a| a.status == AttendanceStatus::ClockedIn)
            .ok_or(AppError::NotClockedIn)?;

        let total_hours = hours_between(open.clock_in_time, now);

        // None when another request closed the row first
        let closed = self
            .repo
            .close(open.id, now, total_hours)
            .await?
            .ok_or(AppError::NotClockedIn)?;

        tracing::info!(user_id, work_date = %today, %total_hours, "clocked out");
        Ok(closed)
    }

    pub async fn current_status(&self, user_id: i32) -> Result<AttendanceStatusView, AppError> {
        let (now, today) = clock();
        let record = self.repo.find_record_for_day(user_id, today).await?;
        Ok(AttendanceStatusView::build(record, today, now))
    }

    pub async fn history(&self, caller: &Claims, query: &HistoryQuery) -> Result<AttendanceHistory, AppError> {
        let user_id = target_user(caller, query.user_id);
        let window = work_date_window(query.start_date, query.end_date);
        let (page, limit) = Pagination::normalize(query.page, query.limit);
        let offset = Pagination::offset(page, limit)?;

        let total = self.repo.count(user_id, window).await?;
        let attendances = self
            .repo
            .history(user_id, window, limit, offset)
            .await?;

        Ok(AttendanceHistory { attendances, pagination: Pagination::new(total, page, limit) })
    }

    pub async fn statistics(
        &self,
        caller: &Claims,
        query: &StatisticsQuery,
    ) -> Result<AttendanceStatistics, AppError> {
        let (now, today) = clock();
        let user_id = target_user(caller, query.user_id);
        let window = work_date_window(query.start_date, query.end_date);
        self.statistics_at(user_id, window, now, today).await
    }

    pub async fn statistics_at(
        &self,
        user_id: i32,
        window: Option<(NaiveDate, NaiveDate)>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<AttendanceStatistics, AppError> {
        let filtered = self.repo.samples(user_id, window).await?;
        let week = self.repo.samples(user_id, Some(week_bounds(today))).await?;
        Ok(AttendanceStatistics::compute(&filtered, &week, today, now))
    }
}
