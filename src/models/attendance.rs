// src/models/attendance.rs

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

pub const MILLIS_PER_HOUR: i64 = 3_600_000;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

// --- ENUMS ---

// Maps the attendance_status type in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    #[sqlx(rename = "Clocked In")]
    #[serde(rename = "Clocked In")]
    ClockedIn,

    #[sqlx(rename = "Clocked Out")]
    #[serde(rename = "Clocked Out")]
    ClockedOut,
}

impl AttendanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::ClockedIn => "Clocked In",
            AttendanceStatus::ClockedOut => "Clocked Out",
        }
    }
}

// --- ROWS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i32,
    pub user_id: i32,
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: Option<DateTime<Utc>>,

    #[schema(value_type = f64, example = 8.5)]
    pub total_hours: Decimal,

    pub status: AttendanceStatus,
    pub notes: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub work_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name and email of the attendance owner, joined from `users`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBrief {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: Attendance,

    #[sqlx(flatten)]
    pub employee: EmployeeBrief,
}

/// The columns the statistics need, nothing more.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceSample {
    pub work_date: NaiveDate,
    pub status: AttendanceStatus,
    pub total_hours: Decimal,
    pub clock_in_time: DateTime<Utc>,
}

// --- HOURS ARITHMETIC ---

/// Unrounded hours between two instants, never negative.
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let millis = (end - start).num_milliseconds().max(0);
    Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
}

/// Presentation rounding for every hour figure: 2 dp, half away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Value stored in `total_hours` on clock-out.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    round_hours(elapsed_hours(start, end))
}

/// Calendar week (Sunday..Saturday) containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_sunday());
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

// --- STATE MACHINE ---

/// A work date admits exactly one clock-in; what already exists decides why a
/// second one is refused.
pub fn ensure_can_clock_in(existing: Option<AttendanceStatus>) -> Result<(), AppError> {
    match existing {
        None => Ok(()),
        Some(AttendanceStatus::ClockedIn) => Err(AppError::AlreadyClockedIn),
        Some(AttendanceStatus::ClockedOut) => Err(AppError::AlreadyClockedOutToday),
    }
}

// --- QUERIES ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only honoured for System Admin callers.
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    /// Only honoured for System Admin callers.
    pub user_id: Option<i32>,
}

/// Both bounds or nothing: a half-open filter is ignored.
pub fn work_date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    match (start, end) {
        (Some(s), Some(e)) => Some((s, e)),
        _ => None,
    }
}

// --- RESPONSES ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Normalizes `page`/`limit` from the query string.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = (total + limit - 1) / limit;
        Self { total, page, limit, total_pages }
    }

    /// Rows to skip for `page`; pages past `i64` range are a client error.
    pub fn offset(page: i64, limit: i64) -> Result<i64, AppError> {
        (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::Validation("Page number is too large".into()))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistory {
    pub attendances: Vec<AttendanceRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatusView {
    pub is_clocked_in: bool,
    #[schema(example = "Clocked In")]
    pub status: String,
    pub clock_in_time: Option<DateTime<Utc>>,
    pub clock_out_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>)]
    pub total_hours: Option<Decimal>,
    #[schema(value_type = f64)]
    pub current_time_worked: Decimal,
    #[schema(value_type = String, format = Date)]
    pub work_date: NaiveDate,
    pub current_time: DateTime<Utc>,
    pub employee: Option<EmployeeBrief>,
}

impl AttendanceStatusView {
    /// Hours worked are recomputed against `now` while clocked in; the stored
    /// value is only trusted after clock-out.
    pub fn build(record: Option<AttendanceRecord>, today: NaiveDate, now: DateTime<Utc>) -> Self {
        match record {
            None => Self {
                is_clocked_in: false,
                status: "Not clocked in".to_string(),
                clock_in_time: None,
                clock_out_time: None,
                total_hours: None,
                current_time_worked: Decimal::ZERO,
                work_date: today,
                current_time: now,
                employee: None,
            },
            Some(record) => {
                let att = record.attendance;
                let is_clocked_in = att.status == AttendanceStatus::ClockedIn;
                let current_time_worked = if is_clocked_in {
                    hours_between(att.clock_in_time, now)
                } else {
                    Decimal::ZERO
                };

                Self {
                    is_clocked_in,
                    status: att.status.label().to_string(),
                    clock_in_time: Some(att.clock_in_time),
                    clock_out_time: att.clock_out_time,
                    total_hours: Some(att.total_hours),
                    current_time_worked,
                    work_date: att.work_date,
                    current_time: now,
                    employee: Some(record.employee),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatistics {
    #[schema(value_type = f64)]
    pub total_hours: Decimal,
    pub total_days: i64,
    #[schema(value_type = f64)]
    pub average_hours: Decimal,
    #[schema(value_type = f64)]
    pub today_hours: Decimal,
    #[schema(value_type = f64)]
    pub week_hours: Decimal,
    pub week_days: i64,
}

impl AttendanceStatistics {
    /// `filtered` is the caller's (optionally date-filtered) history;
    /// `week` is every row of the calendar week containing `today`.
    pub fn compute(
        filtered: &[AttendanceSample],
        week: &[AttendanceSample],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        let total_hours: Decimal = filtered.iter().map(|s| s.total_hours).sum();
        let total_days = filtered.len() as i64;
        let average_hours = if total_days > 0 {
            total_hours / Decimal::from(total_days)
        } else {
            Decimal::ZERO
        };

        let live_or_stored = |s: &AttendanceSample| {
            if s.work_date == today && s.status == AttendanceStatus::ClockedIn {
                elapsed_hours(s.clock_in_time, now)
            } else {
                s.total_hours
            }
        };

        let today_hours = week
            .iter()
            .find(|s| s.work_date == today)
            .map(live_or_stored)
            .unwrap_or(Decimal::ZERO);

        let week_hours: Decimal = week.iter().map(live_or_stored).sum();

        let week_days = week
            .iter()
            .filter(|s| s.total_hours > Decimal::ZERO || s.status == AttendanceStatus::ClockedIn)
            .map(|s| s.work_date)
            .collect::<HashSet<_>>()
            .len() as i64;

        Self {
            total_hours: round_hours(total_hours),
            total_days,
            average_hours: round_hours(average_hours),
            today_hours: round_hours(today_hours),
            week_hours: round_hours(week_hours),
            week_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 17, h, m, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(work_date: NaiveDate, status: AttendanceStatus, hours: Decimal) -> AttendanceSample {
        AttendanceSample {
            work_date,
            status,
            total_hours: hours,
            clock_in_time: Utc.from_utc_datetime(&work_date.and_hms_opt(9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn nine_to_half_past_five_is_eight_and_a_half_hours() {
        assert_eq!(hours_between(at(9, 0), at(17, 30)), Decimal::new(850, 2));
    }

    #[rstest]
    #[case(1, Decimal::new(2, 2))] // 0.0166.. rounds up
    #[case(20, Decimal::new(33, 2))] // 0.333..
    #[case(45, Decimal::new(75, 2))]
    fn minutes_round_to_two_places(#[case] minutes: u32, #[case] expected: Decimal) {
        assert_eq!(hours_between(at(9, 0), at(9, minutes)), expected);
    }

    #[test]
    fn half_cent_rounds_away_from_zero() {
        // 18 s = 0.005 h
        let start = at(9, 0);
        let end = start + Duration::seconds(18);
        assert_eq!(hours_between(start, end), Decimal::new(1, 2));
    }

    #[test]
    fn clock_skew_never_yields_negative_hours() {
        assert_eq!(hours_between(at(17, 0), at(9, 0)), Decimal::ZERO);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(AttendanceStatus::ClockedIn), false)]
    #[case(Some(AttendanceStatus::ClockedOut), false)]
    fn clock_in_allowed_only_on_a_fresh_day(
        #[case] existing: Option<AttendanceStatus>,
        #[case] allowed: bool,
    ) {
        assert_eq!(ensure_can_clock_in(existing).is_ok(), allowed);
    }

    #[test]
    fn clocked_out_day_reports_the_permanent_refusal() {
        let err = ensure_can_clock_in(Some(AttendanceStatus::ClockedOut)).unwrap_err();
        assert!(matches!(err, AppError::AlreadyClockedOutToday));
    }

    #[rstest]
    #[case(date(2024, 1, 17), date(2024, 1, 14), date(2024, 1, 20))] // Wednesday
    #[case(date(2024, 1, 14), date(2024, 1, 14), date(2024, 1, 20))] // Sunday
    #[case(date(2024, 1, 20), date(2024, 1, 14), date(2024, 1, 20))] // Saturday
    #[case(date(2024, 3, 1), date(2024, 2, 25), date(2024, 3, 2))] // leap-year month edge
    fn week_runs_sunday_to_saturday(
        #[case] day: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        assert_eq!(week_bounds(day), (start, end));
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let p = Pagination::new(21, 1, 10);
        assert_eq!(p.total_pages, 3);
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
        assert_eq!(Pagination::offset(3, 10).unwrap(), 20);
    }

    #[test]
    fn pagination_clamps_silly_input() {
        assert_eq!(Pagination::normalize(Some(0), Some(10_000)), (1, MAX_PAGE_SIZE));
        assert_eq!(Pagination::normalize(None, None), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn huge_page_is_a_validation_error() {
        let (page, limit) = Pagination::normalize(Some(i64::MAX), Some(10));
        let err = Pagination::offset(page, limit).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Page number is too large"));
    }

    #[test]
    fn half_open_date_filter_is_ignored() {
        assert_eq!(work_date_window(Some(date(2024, 1, 1)), None), None);
        assert_eq!(
            work_date_window(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))),
            Some((date(2024, 1, 1), date(2024, 1, 31)))
        );
    }

    #[test]
    fn statistics_use_live_hours_only_for_today() {
        let today = date(2024, 1, 17);
        let now = at(12, 0);
        let monday = sample(date(2024, 1, 15), AttendanceStatus::ClockedOut, Decimal::new(800, 2));
        let tuesday = sample(date(2024, 1, 16), AttendanceStatus::ClockedOut, Decimal::new(750, 2));
        // Clocked in at 09:00 today, stored hours still 0.
        let wednesday = sample(today, AttendanceStatus::ClockedIn, Decimal::ZERO);

        let rows = vec![monday, tuesday, wednesday];
        let stats = AttendanceStatistics::compute(&rows, &rows, today, now);

        assert_eq!(stats.total_hours, Decimal::new(1550, 2));
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.average_hours, Decimal::new(517, 2));
        assert_eq!(stats.today_hours, Decimal::new(300, 2));
        assert_eq!(stats.week_hours, Decimal::new(1850, 2));
        assert_eq!(stats.week_days, 3);
    }

    #[test]
    fn stale_clocked_in_row_from_another_day_counts_stored_hours() {
        let today = date(2024, 1, 17);
        let forgotten = sample(date(2024, 1, 16), AttendanceStatus::ClockedIn, Decimal::ZERO);
        let rows = vec![forgotten];

        let stats = AttendanceStatistics::compute(&rows, &rows, today, at(12, 0));

        assert_eq!(stats.week_hours, Decimal::ZERO);
        assert_eq!(stats.today_hours, Decimal::ZERO);
        // Still a working day: the user did clock in.
        assert_eq!(stats.week_days, 1);
    }

    #[test]
    fn zero_hour_closed_days_are_not_working_days() {
        let today = date(2024, 1, 17);
        let rows = vec![sample(date(2024, 1, 15), AttendanceStatus::ClockedOut, Decimal::ZERO)];
        let stats = AttendanceStatistics::compute(&rows, &rows, today, at(12, 0));
        assert_eq!(stats.week_days, 0);
        assert_eq!(stats.total_days, 1);
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let stats = AttendanceStatistics::compute(&[], &[], date(2024, 1, 17), at(12, 0));
        assert_eq!(stats.average_hours, Decimal::ZERO);
        assert_eq!(stats.total_days, 0);
    }

    #[test]
    fn status_view_recomputes_while_clocked_in() {
        let now = at(11, 15);
        let record = AttendanceRecord {
            attendance: Attendance {
                id: 1,
                user_id: 4,
                clock_in_time: at(9, 0),
                clock_out_time: None,
                total_hours: Decimal::ZERO,
                status: AttendanceStatus::ClockedIn,
                notes: None,
                work_date: date(2024, 1, 17),
                created_at: at(9, 0),
                updated_at: at(9, 0),
            },
            employee: EmployeeBrief {
                first_name: "Ada".into(),
                last_name: Some("Lovelace".into()),
                email: "ada@example.com".into(),
            },
        };

        let view = AttendanceStatusView::build(Some(record), date(2024, 1, 17), now);

        assert!(view.is_clocked_in);
        assert_eq!(view.status, "Clocked In");
        assert_eq!(view.current_time_worked, Decimal::new(225, 2));
    }

    #[test]
    fn status_view_without_a_row() {
        let view = AttendanceStatusView::build(None, date(2024, 1, 17), at(8, 0));
        assert!(!view.is_clocked_in);
        assert_eq!(view.status, "Not clocked in");
        assert_eq!(view.current_time_worked, Decimal::ZERO);
    }
}
