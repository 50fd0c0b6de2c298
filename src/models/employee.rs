// src/models/employee.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const EXPIRY_WARNING_DAYS: i64 = 30;
const MAX_NOTIFICATIONS: usize = 10;
const MAX_RECENT: usize = 5;
const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_status")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Terminated,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub user_id: i32,
    pub employee_id: String,
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub emergency_contact: String,
    pub ni_number: String,
    pub visa_type: String,
    pub e_visa_share_code: String,
    #[schema(value_type = String, format = Date)]
    pub visa_start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub visa_end_date: NaiveDate,
    pub bank_name: String,
    pub account_number: String,
    pub sort_code: String,
    pub account_holder: String,
    pub passport_photo: Option<String>,
    pub employment_contract: Option<String>,
    pub right_to_work_document: Option<String>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Employee joined with its user and department, flattened for the table view
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub employee: Employee,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub contact_number: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    pub user_id: i32,
    #[validate(length(min = 1, message = "Employee ID is required"))]
    pub employee_id: String,
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, message = "Nationality is required"))]
    pub nationality: String,
    #[validate(length(min = 1, message = "Emergency contact is required"))]
    pub emergency_contact: String,
    #[validate(length(min = 1, message = "NI Number is required"))]
    pub ni_number: String,
    #[validate(length(min = 1, message = "Visa type is required"))]
    pub visa_type: String,
    #[validate(length(min = 1, message = "eVisa share code is required"))]
    pub e_visa_share_code: String,
    #[schema(value_type = String, format = Date)]
    pub visa_start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub visa_end_date: NaiveDate,
    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "Account number is required"))]
    pub account_number: String,
    #[validate(length(min = 1, message = "Sort code is required"))]
    pub sort_code: String,
    #[validate(length(min = 1, message = "Account holder is required"))]
    pub account_holder: String,
    pub passport_photo: Option<String>,
    pub employment_contract: Option<String>,
    pub right_to_work_document: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, message = "Employee ID cannot be empty"))]
    pub employee_id: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub emergency_contact: Option<String>,
    #[validate(length(min = 1, message = "NI Number cannot be empty"))]
    pub ni_number: Option<String>,
    pub visa_type: Option<String>,
    pub e_visa_share_code: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub visa_start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub visa_end_date: Option<NaiveDate>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub sort_code: Option<String>,
    pub account_holder: Option<String>,
    pub passport_photo: Option<String>,
    pub employment_contract: Option<String>,
    pub right_to_work_document: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeSearchQuery {
    #[serde(default)]
    pub query: String,
}

// --- DASHBOARD ---

/// Where a visa stands relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisaState {
    Expired,
    ExpiringSoon { days_left: i64 },
    Valid,
}

impl VisaState {
    /// A visa ending today is still valid today.
    pub fn classify(visa_end: NaiveDate, today: NaiveDate) -> Self {
        if visa_end < today {
            return VisaState::Expired;
        }
        let days_left = (visa_end - today).num_days();
        if days_left <= EXPIRY_WARNING_DAYS {
            VisaState::ExpiringSoon { days_left }
        } else {
            VisaState::Valid
        }
    }
}

/// Active employee with the fields the dashboard reads.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardEmployee {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub department_name: Option<String>,
    pub visa_type: String,
    pub visa_end_date: NaiveDate,
    pub status: EmployeeStatus,
}

impl DashboardEmployee {
    fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DepartmentHeadcount {
    pub department: String,
    pub employees: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisaStatusCounts {
    pub expired: i64,
    pub expiring_soon: i64,
    pub valid: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryNotification {
    pub key: String,
    pub employee: String,
    pub visa_type: String,
    pub expires_in: String,
    pub status: String,
    #[serde(skip)]
    days_left: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecentEmployee {
    pub key: i32,
    pub name: String,
    pub department: String,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: i64,
    pub department_data: Vec<DepartmentHeadcount>,
    pub visa_status: VisaStatusCounts,
    pub expiry_notifications: Vec<ExpiryNotification>,
    pub recent_employees: Vec<RecentEmployee>,
}

impl DashboardStats {
    /// `employees` are the active employees, newest first; `departments` the
    /// names of active departments.
    pub fn compute(employees: &[DashboardEmployee], departments: &[String], today: NaiveDate) -> Self {
        let mut per_department: HashMap<&str, i64> = HashMap::new();
        for emp in employees {
            let name = emp.department_name.as_deref().unwrap_or(UNASSIGNED);
            *per_department.entry(name).or_default() += 1;
        }

        let department_data = departments
            .iter()
            .map(|name| DepartmentHeadcount {
                department: name.clone(),
                employees: per_department.get(name.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let mut visa_status = VisaStatusCounts::default();
        let mut notifications = Vec::new();

        for emp in employees {
            let (expires_in, status, days_left) = match VisaState::classify(emp.visa_end_date, today) {
                VisaState::Valid => {
                    visa_status.valid += 1;
                    continue;
                }
                VisaState::Expired => {
                    visa_status.expired += 1;
                    ("Expired".to_string(), "Expired", -1)
                }
                VisaState::ExpiringSoon { days_left } => {
                    visa_status.expiring_soon += 1;
                    (format!("{} days", days_left), "Expiring Soon", days_left)
                }
            };

            notifications.push(ExpiryNotification {
                key: format!("emp-{}", emp.id),
                employee: emp.display_name(),
                visa_type: emp.visa_type.clone(),
                expires_in,
                status: status.to_string(),
                days_left,
            });
        }

        // Expired first (days_left = -1), then soonest to expire.
        notifications.sort_by_key(|n| n.days_left);
        notifications.truncate(MAX_NOTIFICATIONS);

        let recent_employees = employees
            .iter()
            .take(MAX_RECENT)
            .map(|emp| RecentEmployee {
                key: emp.id,
                name: emp.display_name(),
                department: emp.department_name.clone().unwrap_or_else(|| UNASSIGNED.to_string()),
                status: emp.status,
            })
            .collect();

        Self {
            total_employees: employees.len() as i64,
            department_data,
            visa_status,
            expiry_notifications: notifications,
            recent_employees,
        }
    }
}
