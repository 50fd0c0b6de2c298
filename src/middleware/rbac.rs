// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::{auth::Claims, user::UserRole},
};

/// A role gate: which role passes and what the others are told.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
    fn denied() -> &'static str;
}

/// Extractor that only lets callers of `T::role()` through. Yields the
/// caller's claims so handlers do not need `AuthenticatedUser` as well.
pub struct RequireRole<T> {
    pub claims: Claims,
    _role: PhantomData<T>,
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if claims.role != T::role() {
            tracing::warn!(user_id = claims.id, role = ?claims.role, "role check failed");
            return Err(AppError::Forbidden(T::denied().into()));
        }

        Ok(RequireRole { claims, _role: PhantomData })
    }
}

// ---
// ROLE GATES
// ---

pub struct LeaveApprover;
impl RoleDef for LeaveApprover {
    fn role() -> UserRole {
        UserRole::SystemAdmin
    }
    fn denied() -> &'static str {
        "Only System Admin can approve/reject leaves"
    }
}
