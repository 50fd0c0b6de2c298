// src/test_support.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{
    auth::Claims,
    user::{Gender, UserRole},
};

pub const PASSWORD: &str = "secret123";

/// Inserts an active user and returns its id. The password is `PASSWORD`,
/// hashed at bcrypt's lowest cost.
pub async fn insert_user(pool: &PgPool, username: &str, role: UserRole) -> i32 {
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    sqlx::query_scalar(
        r#"
        INSERT INTO users (
            first_name, gender, date_of_birth, contact_number,
            role, username, email, password_hash
        )
        VALUES ($1, $2, $3, '07000000000', $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(Gender::Other)
    .bind(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
    .bind(role)
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(hash)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn claims_for(id: i32, role: UserRole) -> Claims {
    Claims { id, role, email: format!("user{}@example.com", id), department: None, iat: 0, exp: 0 }
}
