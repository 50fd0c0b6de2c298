// src/models/leave.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

/// Annual leave days shown to the employee. Informational: applications are
/// not refused when it runs out.
pub const ANNUAL_ENTITLEMENT: i64 = 20;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_type")]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
    Maternity,
    Paternity,
    Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_status")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Pending and Approved leaves block the calendar; Rejected ones do not.
    pub fn blocks_calendar(&self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    /// Approved and Rejected are terminal.
    pub fn ensure_pending(&self, message: &'static str) -> Result<(), AppError> {
        match self {
            LeaveStatus::Pending => Ok(()),
            _ => Err(AppError::NotPending(message)),
        }
    }
}

pub const NOT_PENDING_FOR_DECISION: &str = "Leave is not in pending status";
pub const NOT_PENDING_FOR_UPDATE: &str = "Only pending leaves can be updated";
pub const NOT_PENDING_FOR_DELETE: &str = "Only pending leaves can be deleted";

// --- DATE RANGE ---

/// Inclusive calendar range; construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both ends count: a one-day leave has `start == end` and lasts 1 day.
    pub fn total_days(&self) -> i32 {
        (self.end - self.start).num_days() as i32 + 1
    }

    /// Closed-interval intersection.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Window filter used by the list endpoint: the leave starts inside the
    /// window, ends inside it, or covers all of it.
    pub fn touches_window(&self, window: &DateRange) -> bool {
        let starts_inside = self.start >= window.start && self.start <= window.end;
        let ends_inside = self.end >= window.start && self.end <= window.end;
        let covers = self.start <= window.start && self.end >= window.end;
        starts_inside || ends_inside || covers
    }
}

/// First existing range that collides with `candidate`, if any.
pub fn find_overlap<'a, I>(candidate: &DateRange, existing: I) -> Option<&'a DateRange>
where
    I: IntoIterator<Item = &'a DateRange>,
{
    existing.into_iter().find(|r| r.overlaps(candidate))
}

// --- ROWS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: i32,
    pub user_id: i32,
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub comment: Option<String>,
    pub status: LeaveStatus,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Leave {
    pub fn range(&self) -> DateRange {
        DateRange { start: self.start_date, end: self.end_date }
    }
}

// Leave joined with the applicant (and approver, when decided)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub leave: Leave,
    pub employee_first_name: String,
    pub employee_last_name: Option<String>,
    pub employee_email: String,
    pub approver_first_name: Option<String>,
    pub approver_last_name: Option<String>,
}

/// The columns needed to compute statistics.
#[derive(Debug, Clone, FromRow)]
pub struct LeaveSample {
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    pub total_days: i32,
}

// --- PAYLOADS ---

// Shared by apply and update. Missing fields are reported together.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    pub leave_type: Option<LeaveType>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub comment: Option<String>,
}

/// Validated form of `LeavePayload`.
#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub leave_type: LeaveType,
    pub range: DateRange,
    pub comment: Option<String>,
}

impl TryFrom<LeavePayload> for LeaveRequest {
    type Error = AppError;

    fn try_from(payload: LeavePayload) -> Result<Self, Self::Error> {
        let (Some(leave_type), Some(start), Some(end)) =
            (payload.leave_type, payload.start_date, payload.end_date)
        else {
            return Err(AppError::Validation(
                "Leave type, start date, and end date are required".into(),
            ));
        };

        Ok(Self {
            leave_type,
            range: DateRange::new(start, end)?,
            comment: payload.comment,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectLeavePayload {
    pub rejection_reason: Option<String>,
}

impl RejectLeavePayload {
    pub fn reason(&self) -> Result<&str, AppError> {
        match self.rejection_reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => Ok(reason),
            _ => Err(AppError::RejectionReasonRequired),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    pub status: Option<LeaveStatus>,
    pub leave_type: Option<LeaveType>,
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    /// Only honoured for System Admin callers.
    pub user_id: Option<i32>,
}

// --- STATISTICS ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusCount {
    pub name: LeaveStatus,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct LeaveDays {
    pub annual: i64,
    pub sick: i64,
    pub casual: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatistics {
    pub summary: Vec<StatusCount>,
    pub total_leaves: i64,
    pub leave_days: LeaveDays,
    pub annual_entitlement: i64,
    pub remaining_annual: i64,
}

impl LeaveStatistics {
    /// Day totals only count approved leaves; `total` covers the three reported types.
    pub fn compute(samples: &[LeaveSample]) -> Self {
        let count = |status: LeaveStatus| samples.iter().filter(|s| s.status == status).count() as i64;

        let summary = [LeaveStatus::Approved, LeaveStatus::Pending, LeaveStatus::Rejected]
            .into_iter()
            .map(|status| StatusCount { name: status, value: count(status) })
            .collect();

        let mut days = LeaveDays::default();
        for sample in samples.iter().filter(|s| s.status == LeaveStatus::Approved) {
            let d = i64::from(sample.total_days);
            match sample.leave_type {
                LeaveType::Annual => days.annual += d,
                LeaveType::Sick => days.sick += d,
                LeaveType::Casual => days.casual += d,
                _ => continue,
            }
            days.total += d;
        }

        Self {
            summary,
            total_leaves: samples.len() as i64,
            remaining_annual: ANNUAL_ENTITLEMENT - days.annual,
            leave_days: days,
            annual_entitlement: ANNUAL_ENTITLEMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
        DateRange::new(a, b).unwrap()
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = DateRange::new(d(2024, 1, 10), d(2024, 1, 9)).unwrap_err();
        assert!(matches!(err, AppError::InvalidDateRange));
    }

    #[rstest]
    #[case(d(2024, 1, 1), d(2024, 1, 1), 1)]
    #[case(d(2024, 1, 1), d(2024, 1, 5), 5)]
    #[case(d(2024, 2, 28), d(2024, 3, 1), 3)] // leap day counted
    fn total_days_is_inclusive(#[case] start: NaiveDate, #[case] end: NaiveDate, #[case] days: i32) {
        assert_eq!(range(start, end).total_days(), days);
    }

    #[rstest]
    #[case(range(d(2024, 1, 1), d(2024, 1, 5)), range(d(2024, 1, 4), d(2024, 1, 10)), true)]
    #[case(range(d(2024, 1, 1), d(2024, 1, 5)), range(d(2024, 1, 5), d(2024, 1, 5)), true)] // shared endpoint
    #[case(range(d(2024, 1, 1), d(2024, 1, 5)), range(d(2024, 1, 6), d(2024, 1, 8)), false)]
    #[case(range(d(2024, 1, 2), d(2024, 1, 3)), range(d(2024, 1, 1), d(2024, 1, 9)), true)] // contained
    fn overlap_is_closed_interval_intersection(
        #[case] a: DateRange,
        #[case] b: DateRange,
        #[case] expected: bool,
    ) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn find_overlap_reports_the_colliding_range() {
        let existing = [range(d(2024, 1, 1), d(2024, 1, 5)), range(d(2024, 2, 1), d(2024, 2, 2))];
        let candidate = range(d(2024, 1, 4), d(2024, 1, 10));
        assert_eq!(find_overlap(&candidate, &existing), Some(&existing[0]));

        let clear = range(d(2024, 1, 6), d(2024, 1, 31));
        assert_eq!(find_overlap(&clear, &existing), None);
    }

    #[rstest]
    #[case(range(d(2024, 1, 3), d(2024, 1, 20)), true)] // starts inside
    #[case(range(d(2023, 12, 25), d(2024, 1, 2)), true)] // ends inside
    #[case(range(d(2023, 12, 1), d(2024, 2, 1)), true)] // covers
    #[case(range(d(2023, 12, 1), d(2023, 12, 31)), false)]
    fn window_filter(#[case] leave: DateRange, #[case] expected: bool) {
        let window = range(d(2024, 1, 1), d(2024, 1, 10));
        assert_eq!(leave.touches_window(&window), expected);
    }

    #[test]
    fn payload_with_missing_fields_is_rejected() {
        let payload = LeavePayload {
            leave_type: Some(LeaveType::Annual),
            start_date: None,
            end_date: Some(d(2024, 1, 5)),
            comment: None,
        };
        let err = LeaveRequest::try_from(payload).unwrap_err();
        assert_eq!(err.to_string(), "Leave type, start date, and end date are required");
    }

    #[test]
    fn payload_with_inverted_dates_is_rejected() {
        let payload = LeavePayload {
            leave_type: Some(LeaveType::Sick),
            start_date: Some(d(2024, 1, 10)),
            end_date: Some(d(2024, 1, 9)),
            comment: None,
        };
        assert!(matches!(LeaveRequest::try_from(payload), Err(AppError::InvalidDateRange)));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_rejection_reason_is_required(#[case] reason: Option<&str>) {
        let payload = RejectLeavePayload { rejection_reason: reason.map(String::from) };
        assert!(matches!(payload.reason(), Err(AppError::RejectionReasonRequired)));
    }

    #[test]
    fn decided_leaves_are_terminal() {
        assert!(LeaveStatus::Pending.ensure_pending(NOT_PENDING_FOR_DECISION).is_ok());
        let err = LeaveStatus::Approved.ensure_pending(NOT_PENDING_FOR_DECISION).unwrap_err();
        assert_eq!(err.to_string(), "Leave is not in pending status");
        assert!(LeaveStatus::Rejected.ensure_pending(NOT_PENDING_FOR_DELETE).is_err());
    }

    #[test]
    fn rejected_leaves_free_the_calendar() {
        assert!(LeaveStatus::Pending.blocks_calendar());
        assert!(LeaveStatus::Approved.blocks_calendar());
        assert!(!LeaveStatus::Rejected.blocks_calendar());
    }

    #[test]
    fn statistics_count_only_approved_days() {
        let samples = vec![
            LeaveSample { leave_type: LeaveType::Annual, status: LeaveStatus::Approved, total_days: 5 },
            LeaveSample { leave_type: LeaveType::Annual, status: LeaveStatus::Pending, total_days: 3 },
            LeaveSample { leave_type: LeaveType::Sick, status: LeaveStatus::Approved, total_days: 2 },
            LeaveSample { leave_type: LeaveType::Unpaid, status: LeaveStatus::Approved, total_days: 1 },
            LeaveSample { leave_type: LeaveType::Casual, status: LeaveStatus::Rejected, total_days: 4 },
        ];

        let stats = LeaveStatistics::compute(&samples);

        assert_eq!(stats.total_leaves, 5);
        assert_eq!(stats.leave_days, LeaveDays { annual: 5, sick: 2, casual: 0, total: 7 });
        assert_eq!(stats.remaining_annual, 15);
        assert_eq!(
            stats.summary,
            vec![
                StatusCount { name: LeaveStatus::Approved, value: 3 },
                StatusCount { name: LeaveStatus::Pending, value: 1 },
                StatusCount { name: LeaveStatus::Rejected, value: 1 },
            ]
        );
    }

    #[test]
    fn day_total_leaves_out_unreported_types() {
        let samples = vec![
            LeaveSample { leave_type: LeaveType::Annual, status: LeaveStatus::Approved, total_days: 2 },
            LeaveSample { leave_type: LeaveType::Maternity, status: LeaveStatus::Approved, total_days: 90 },
            LeaveSample { leave_type: LeaveType::Paternity, status: LeaveStatus::Approved, total_days: 10 },
        ];

        let stats = LeaveStatistics::compute(&samples);

        assert_eq!(stats.leave_days, LeaveDays { annual: 2, sick: 0, casual: 0, total: 2 });
        assert_eq!(stats.summary[0], StatusCount { name: LeaveStatus::Approved, value: 3 });
    }

    #[test]
    fn remaining_annual_may_go_negative() {
        let samples = vec![LeaveSample {
            leave_type: LeaveType::Annual,
            status: LeaveStatus::Approved,
            total_days: 25,
        }];
        assert_eq!(LeaveStatistics::compute(&samples).remaining_annual, -5);
    }
}
