// src/services/user_service.rs

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::Claims,
        user::{
            check_profile_picture, CreateUserPayload, UpdatePasswordPayload, UpdateUserPayload, User,
            UserWithDepartment,
        },
    },
    services::auth::{hash_password, verify_password},
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        if let Some(picture) = &payload.profile_picture {
            check_profile_picture(picture)?;
        }

        let password_hash = hash_password(&payload.password).await?;
        let user = self.repo.create(payload, &password_hash).await?;

        tracing::info!(user_id = user.id, role = ?user.role, "user created");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<UserWithDepartment>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<UserWithDepartment, AppError> {
        self.repo
            .find_with_department(id)
            .await?
            .ok_or(AppError::NotFound("User not found"))
    }

    pub async fn list_by_department(&self, department_id: i32) -> Result<Vec<UserWithDepartment>, AppError> {
        self.repo.list_by_department(department_id).await
    }

    pub async fn update(&self, id: i32, changes: &UpdateUserPayload) -> Result<User, AppError> {
        if let Some(picture) = &changes.profile_picture {
            check_profile_picture(picture)?;
        }

        let password_hash = match &changes.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        self.repo
            .update(id, changes, password_hash.as_deref())
            .await?
            .ok_or(AppError::NotFound("User not found"))
    }

    pub async fn set_status(&self, id: i32, status: bool) -> Result<User, AppError> {
        let user = self
            .repo
            .set_status(id, status)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        tracing::info!(user_id = id, status, "user status changed");
        Ok(user)
    }

    // Owner or System Admin; the current password is always required
    pub async fn change_password(
        &self,
        caller: &Claims,
        id: i32,
        payload: &UpdatePasswordPayload,
    ) -> Result<(), AppError> {
        if !caller.can_act_for(id) {
            return Err(AppError::Forbidden("You can only change your own password".into()));
        }

        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User not found"))?;

        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::Validation("Current password is incorrect".into()));
        }

        let password_hash = hash_password(&payload.new_password).await?;
        self.repo.set_password(id, &password_hash).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("User not found"));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}
