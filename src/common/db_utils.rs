// src/common/db_utils.rs

use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;

// Advisory-lock namespaces (first key of pg_advisory_xact_lock(int, int)).
pub(crate) const LOCK_LEAVES: i32 = 1;

// ---
// Constraint name -> domain error
// ---
/// Converts constraint violations raised by the database into the same errors
/// the services raise from their own pre-checks. Anything else stays a
/// `Database` error.
pub(crate) fn map_constraint_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(constraint) = db_err.constraint() {
            let mapped = match constraint {
                "departments_name_key" => Some(AppError::Conflict("Department name must be unique".into())),
                "users_username_key" => Some(AppError::Conflict("Username already exists".into())),
                "users_email_key" => Some(AppError::Conflict("Email already exists".into())),
                "employees_employee_id_key" => Some(AppError::Conflict("Employee ID already exists".into())),
                "employees_ni_number_key" => Some(AppError::Conflict("NI Number already exists".into())),
                "employees_user_id_key" => {
                    Some(AppError::Conflict("This user already has an employee record".into()))
                }
                "leaves_no_overlap" => Some(AppError::OverlappingLeave),
                _ => None,
            };

            if let Some(app_err) = mapped {
                return app_err;
            }

            if db_err.is_unique_violation() {
                return AppError::Conflict(format!("Unique constraint '{}' violated", constraint));
            }
        }
    }
    err.into()
}

/// Serializes writers of one user's rows for the rest of the transaction.
pub(crate) async fn lock_user_scope(
    tx: &mut Transaction<'_, Postgres>,
    namespace: i32,
    user_id: i32,
) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(namespace)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_constraint_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
