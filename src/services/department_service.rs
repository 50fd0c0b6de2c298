// src/services/department_service.rs

use crate::{
    common::error::AppError,
    db::DepartmentRepository,
    models::department::{CreateDepartmentPayload, Department, UpdateDepartmentPayload},
};

const NAME_TAKEN: &str = "Department name must be unique";

#[derive(Clone)]
pub struct DepartmentService {
    repo: DepartmentRepository,
}

impl DepartmentService {
    pub fn new(repo: DepartmentRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: &CreateDepartmentPayload) -> Result<Department, AppError> {
        let name = payload.trimmed_name();
        if name.is_empty() {
            return Err(AppError::Validation("Department name is required".into()));
        }

        // The unique constraint still backs this check under concurrency.
        if self.repo.name_taken(name, None).await? {
            return Err(AppError::Conflict(NAME_TAKEN.into()));
        }

        let department = self
            .repo
            .create(name, payload.description.as_deref(), payload.status.unwrap_or(true))
            .await?;

        tracing::info!(department_id = department.id, "department created");
        Ok(department)
    }

    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Department, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Department not found"))
    }

    pub async fn update(&self, id: i32, changes: &UpdateDepartmentPayload) -> Result<Department, AppError> {
        let name = changes.name.as_deref().map(str::trim);
        if let Some(name) = name {
            if name.is_empty() {
                return Err(AppError::Validation("Department name cannot be empty".into()));
            }
            if self.repo.name_taken(name, Some(id)).await? {
                return Err(AppError::Conflict(NAME_TAKEN.into()));
            }
        }

        self.repo
            .update(id, name, changes.description.as_deref(), changes.status)
            .await?
            .ok_or(AppError::NotFound("Department not found"))
    }

    pub async fn set_status(&self, id: i32, status: bool) -> Result<Department, AppError> {
        self.repo
            .update(id, None, None, Some(status))
            .await?
            .ok_or(AppError::NotFound("Department not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Department not found"));
        }
        tracing::info!(department_id = id, "department deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;

    fn payload(name: &str) -> CreateDepartmentPayload {
        CreateDepartmentPayload { name: name.into(), description: None, status: None }
    }

    #[sqlx::test]
    async fn duplicate_name_is_a_conflict(pool: PgPool) {
        let service = DepartmentService::new(DepartmentRepository::new(pool));

        let hr = service.create(&payload("HR")).await.unwrap();
        assert_eq!(hr.name, "HR");
        assert!(hr.status);

        let again = service.create(&payload("HR")).await;
        assert!(matches!(again, Err(AppError::Conflict(message)) if message == NAME_TAKEN));
    }

    #[sqlx::test]
    async fn name_is_trimmed_before_the_uniqueness_check(pool: PgPool) {
        let service = DepartmentService::new(DepartmentRepository::new(pool));

        service.create(&payload("Finance")).await.unwrap();
        let padded = service.create(&payload("  Finance ")).await;
        assert!(matches!(padded, Err(AppError::Conflict(_))));
    }

    #[sqlx::test]
    async fn renaming_onto_a_taken_name_is_a_conflict(pool: PgPool) {
        let service = DepartmentService::new(DepartmentRepository::new(pool));

        service.create(&payload("Sales")).await.unwrap();
        let ops = service.create(&payload("Ops")).await.unwrap();

        let rename = UpdateDepartmentPayload { name: Some("Sales".into()), description: None, status: None };
        assert!(matches!(service.update(ops.id, &rename).await, Err(AppError::Conflict(_))));

        // Keeping its own name is fine
        let keep = UpdateDepartmentPayload { name: Some("Ops".into()), description: None, status: Some(false) };
        let updated = service.update(ops.id, &keep).await.unwrap();
        assert!(!updated.status);
    }
}
