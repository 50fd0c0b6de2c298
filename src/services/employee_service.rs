// src/services/employee_service.rs

use chrono::Local;

use crate::{
    common::error::AppError,
    db::{DepartmentRepository, EmployeeRepository, UserRepository},
    models::{
        employee::{
            CreateEmployeePayload, DashboardStats, Employee, EmployeeListItem, UpdateEmployeePayload,
        },
        user::AvailableUser,
    },
};

const EMPLOYEE_ID_TAKEN: &str = "Employee ID already exists";
const NI_NUMBER_TAKEN: &str = "NI Number already exists";

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    user_repo: UserRepository,
    department_repo: DepartmentRepository,
}

impl EmployeeService {
    pub fn new(
        repo: EmployeeRepository,
        user_repo: UserRepository,
        department_repo: DepartmentRepository,
    ) -> Self {
        Self { repo, user_repo, department_repo }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeListItem>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<EmployeeListItem, AppError> {
        self.repo.find(id).await?.ok_or(AppError::NotFound("Employee not found"))
    }

    pub async fn create(&self, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        if self.user_repo.find_by_id(payload.user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }
        if self.repo.employee_id_taken(&payload.employee_id).await? {
            return Err(AppError::Conflict(EMPLOYEE_ID_TAKEN.into()));
        }
        if self.repo.ni_number_taken(&payload.ni_number).await? {
            return Err(AppError::Conflict(NI_NUMBER_TAKEN.into()));
        }

        let employee = self.repo.create(payload).await?;
        tracing::info!(employee_id = employee.id, user_id = employee.user_id, "employee created");
        Ok(employee)
    }

    // Uniqueness is only re-checked for values that actually change
    pub async fn update(&self, id: i32, changes: &UpdateEmployeePayload) -> Result<Employee, AppError> {
        let current = self
            .repo
            .find_row(id)
            .await?
            .ok_or(AppError::NotFound("Employee not found"))?;

        if let Some(employee_id) = changes.employee_id.as_deref() {
            if employee_id != current.employee_id && self.repo.employee_id_taken(employee_id).await? {
                return Err(AppError::Conflict(EMPLOYEE_ID_TAKEN.into()));
            }
        }
        if let Some(ni_number) = changes.ni_number.as_deref() {
            if ni_number != current.ni_number && self.repo.ni_number_taken(ni_number).await? {
                return Err(AppError::Conflict(NI_NUMBER_TAKEN.into()));
            }
        }

        self.repo
            .update(id, changes)
            .await?
            .ok_or(AppError::NotFound("Employee not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Employee not found"));
        }
        tracing::info!(employee_id = id, "employee deleted");
        Ok(())
    }

    pub async fn list_by_department(&self, department_id: i32) -> Result<Vec<EmployeeListItem>, AppError> {
        self.repo.list_by_department(department_id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<EmployeeListItem>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return self.repo.list().await;
        }
        self.repo.search(query).await
    }

    pub async fn available_users(&self) -> Result<Vec<AvailableUser>, AppError> {
        self.repo.available_users().await
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let employees = self.repo.dashboard_rows().await?;
        let departments = self.department_repo.list_active_names().await?;
        Ok(DashboardStats::compute(&employees, &departments, Local::now().date_naive()))
    }
}
