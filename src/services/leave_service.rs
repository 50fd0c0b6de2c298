// src/services/leave_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{lock_user_scope, LOCK_LEAVES},
        error::AppError,
    },
    db::LeaveRepository,
    models::{
        auth::Claims,
        leave::{
            find_overlap, DateRange, Leave, LeaveFilter, LeavePayload, LeaveRecord, LeaveRequest,
            LeaveStatistics, LeaveStatus, RejectLeavePayload, NOT_PENDING_FOR_DECISION,
            NOT_PENDING_FOR_DELETE, NOT_PENDING_FOR_UPDATE,
        },
    },
};

#[derive(Clone)]
pub struct LeaveService {
    repo: LeaveRepository,
    pool: PgPool,
}

impl LeaveService {
    pub fn new(repo: LeaveRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn apply(&self, user_id: i32, payload: LeavePayload) -> Result<Leave, AppError> {
        let request = LeaveRequest::try_from(payload)?;
        let leave = self.write_checked(user_id, None, &request).await?;

        tracing::info!(
            leave_id = leave.id,
            user_id,
            days = leave.total_days,
            "leave requested"
        );
        Ok(leave)
    }

    pub async fn update(&self, caller: &Claims, id: i32, payload: LeavePayload) -> Result<Leave, AppError> {
        let current = self.find(id).await?;
        if !caller.can_act_for(current.user_id) {
            return Err(AppError::Forbidden("You can only update your own leaves".into()));
        }
        current.status.ensure_pending(NOT_PENDING_FOR_UPDATE)?;

        let request = LeaveRequest::try_from(payload)?;
        self.write_checked(current.user_id, Some(id), &request).await
    }

    /// Overlap check and write under the owner's advisory lock, so two
    /// requests for the same user cannot both pass the check. `editing` is
    /// the leave being rewritten, if any; it never collides with itself.
    async fn write_checked(
        &self,
        owner_id: i32,
        editing: Option<i32>,
        request: &LeaveRequest,
    ) -> Result<Leave, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_scope(&mut tx, LOCK_LEAVES, owner_id).await?;

        let existing = self.repo.list_for_user(&mut *tx, owner_id).await?;
        let blocking: Vec<DateRange> = existing
            .iter()
            .filter(|l| l.status.blocks_calendar() && Some(l.id) != editing)
            .map(Leave::range)
            .collect();

        if let Some(clash) = find_overlap(&request.range, &blocking) {
            tracing::debug!(owner_id, start = %clash.start(), end = %clash.end(), "leave overlap");
            return Err(AppError::OverlappingLeave);
        }

        let leave = match editing {
            None => self.repo.insert(&mut *tx, owner_id, request).await?,
            Some(id) => self
                .repo
                .update_pending(&mut *tx, id, request)
                .await?
                .ok_or(AppError::NotPending(NOT_PENDING_FOR_UPDATE))?,
        };

        tx.commit().await?;
        Ok(leave)
    }

    pub async fn delete(&self, caller: &Claims, id: i32) -> Result<(), AppError> {
        let current = self.find(id).await?;
        if !caller.can_act_for(current.user_id) {
            return Err(AppError::Forbidden("You can only delete your own leaves".into()));
        }
        current.status.ensure_pending(NOT_PENDING_FOR_DELETE)?;

        if !self.repo.delete_pending(id).await? {
            return Err(AppError::NotPending(NOT_PENDING_FOR_DELETE));
        }
        tracing::info!(leave_id = id, "leave deleted");
        Ok(())
    }

    pub async fn approve(&self, approver: &Claims, id: i32) -> Result<Leave, AppError> {
        self.decide(approver, id, LeaveStatus::Approved, None).await
    }

    pub async fn reject(
        &self,
        approver: &Claims,
        id: i32,
        payload: &RejectLeavePayload,
    ) -> Result<Leave, AppError> {
        let reason = payload.reason()?;
        self.decide(approver, id, LeaveStatus::Rejected, Some(reason)).await
    }

    async fn decide(
        &self,
        approver: &Claims,
        id: i32,
        status: LeaveStatus,
        reason: Option<&str>,
    ) -> Result<Leave, AppError> {
        match self.repo.decide(id, status, approver.id, Utc::now(), reason).await? {
            Some(leave) => {
                tracing::info!(leave_id = id, approver = approver.id, ?status, "leave decided");
                Ok(leave)
            }
            // Nothing updated: tell "missing" apart from "already decided".
            None => match self.repo.find(id).await? {
                None => Err(AppError::NotFound("Leave not found")),
                Some(_) => Err(AppError::NotPending(NOT_PENDING_FOR_DECISION)),
            },
        }
    }

    pub async fn get(&self, caller: &Claims, id: i32) -> Result<LeaveRecord, AppError> {
        let record = self
            .repo
            .find_record(id)
            .await?
            .ok_or(AppError::NotFound("Leave not found"))?;

        if !caller.can_act_for(record.leave.user_id) {
            return Err(AppError::Forbidden("You do not have permission to view this leave".into()));
        }
        Ok(record)
    }

    pub async fn list(&self, caller: &Claims, filter: &LeaveFilter) -> Result<Vec<LeaveRecord>, AppError> {
        let user_id = if caller.is_system_admin() { filter.user_id } else { Some(caller.id) };

        let window = match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            _ => None,
        };

        let mut records = self.repo.list(user_id, filter.status, filter.leave_type).await?;
        if let Some(window) = window {
            records.retain(|r| r.leave.range().touches_window(&window));
        }
        Ok(records)
    }

    pub async fn statistics(&self, caller: &Claims) -> Result<LeaveStatistics, AppError> {
        let scope = if caller.is_system_admin() { None } else { Some(caller.id) };
        let samples = self.repo.samples(scope).await?;
        Ok(LeaveStatistics::compute(&samples))
    }

    async fn find(&self, id: i32) -> Result<Leave, AppError> {
        self.repo.find(id).await?.ok_or(AppError::NotFound("Leave not found"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::{leave::LeaveType, user::UserRole},
        test_support::{claims_for, insert_user},
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn request(start: u32, end: u32) -> LeavePayload {
        LeavePayload {
            leave_type: Some(LeaveType::Annual),
            start_date: Some(day(start)),
            end_date: Some(day(end)),
            comment: None,
        }
    }

    fn service(pool: &PgPool) -> LeaveService {
        LeaveService::new(LeaveRepository::new(pool.clone()), pool.clone())
    }

    #[sqlx::test]
    async fn overlapping_request_is_refused(pool: PgPool) {
        let user_id = insert_user(&pool, "holiday", UserRole::Employee).await;
        let leaves = service(&pool);

        let first = leaves.apply(user_id, request(10, 14)).await.unwrap();
        assert_eq!(first.total_days, 5);
        assert_eq!(first.status, LeaveStatus::Pending);

        let clash = leaves.apply(user_id, request(14, 16)).await;
        assert!(matches!(clash, Err(AppError::OverlappingLeave)));

        // Another user's calendar is independent
        let other = insert_user(&pool, "colleague", UserRole::Employee).await;
        leaves.apply(other, request(12, 13)).await.unwrap();
    }

    #[sqlx::test]
    async fn update_does_not_collide_with_itself(pool: PgPool) {
        let user_id = insert_user(&pool, "mover", UserRole::Employee).await;
        let leaves = service(&pool);
        let caller = claims_for(user_id, UserRole::Employee);

        let leave = leaves.apply(user_id, request(10, 14)).await.unwrap();
        let moved = leaves.update(&caller, leave.id, request(12, 18)).await.unwrap();

        assert_eq!(moved.id, leave.id);
        assert_eq!(moved.start_date, day(12));
        assert_eq!(moved.total_days, 7);
    }

    #[sqlx::test]
    async fn update_into_another_leave_is_refused(pool: PgPool) {
        let user_id = insert_user(&pool, "planner", UserRole::Employee).await;
        let leaves = service(&pool);
        let caller = claims_for(user_id, UserRole::Employee);

        leaves.apply(user_id, request(1, 3)).await.unwrap();
        let second = leaves.apply(user_id, request(10, 12)).await.unwrap();

        let result = leaves.update(&caller, second.id, request(2, 11)).await;
        assert!(matches!(result, Err(AppError::OverlappingLeave)));
    }

    #[sqlx::test]
    async fn leave_can_only_be_decided_once(pool: PgPool) {
        let user_id = insert_user(&pool, "requester", UserRole::Employee).await;
        let admin_id = insert_user(&pool, "approver", UserRole::SystemAdmin).await;
        let leaves = service(&pool);
        let admin = claims_for(admin_id, UserRole::SystemAdmin);

        let leave = leaves.apply(user_id, request(10, 11)).await.unwrap();

        let approved = leaves.approve(&admin, leave.id).await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by, Some(admin_id));
        assert!(approved.approved_at.is_some());

        let again = leaves.approve(&admin, leave.id).await;
        assert!(matches!(again, Err(AppError::NotPending(_))));

        let reject = RejectLeavePayload { rejection_reason: Some("too late".into()) };
        let rejected = leaves.reject(&admin, leave.id, &reject).await;
        assert!(matches!(rejected, Err(AppError::NotPending(_))));
    }

    #[sqlx::test]
    async fn deciding_a_missing_leave_is_not_found(pool: PgPool) {
        let admin_id = insert_user(&pool, "admin", UserRole::SystemAdmin).await;
        let admin = claims_for(admin_id, UserRole::SystemAdmin);

        let result = service(&pool).approve(&admin, 4242).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test]
    async fn rejected_leave_frees_the_dates(pool: PgPool) {
        let user_id = insert_user(&pool, "retry", UserRole::Employee).await;
        let admin_id = insert_user(&pool, "boss", UserRole::SystemAdmin).await;
        let leaves = service(&pool);
        let admin = claims_for(admin_id, UserRole::SystemAdmin);

        let leave = leaves.apply(user_id, request(10, 14)).await.unwrap();
        let reject = RejectLeavePayload { rejection_reason: Some("Busy week".into()) };
        let rejected = leaves.reject(&admin, leave.id, &reject).await.unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Busy week"));

        leaves.apply(user_id, request(10, 14)).await.unwrap();
    }

    #[sqlx::test]
    async fn employees_cannot_touch_someone_elses_leave(pool: PgPool) {
        let owner = insert_user(&pool, "owner", UserRole::Employee).await;
        let stranger = insert_user(&pool, "stranger", UserRole::Employee).await;
        let leaves = service(&pool);

        let leave = leaves.apply(owner, request(10, 11)).await.unwrap();
        let caller = claims_for(stranger, UserRole::Employee);

        assert!(matches!(leaves.update(&caller, leave.id, request(12, 13)).await, Err(AppError::Forbidden(_))));
        assert!(matches!(leaves.delete(&caller, leave.id).await, Err(AppError::Forbidden(_))));
    }
}
