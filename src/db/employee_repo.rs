// src/db/employee_repo.rs

use sqlx::PgPool;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::{
        employee::{CreateEmployeePayload, DashboardEmployee, Employee, EmployeeListItem, UpdateEmployeePayload},
        user::AvailableUser,
    },
};

const SELECT_LIST_ITEM: &str = r#"
    SELECT e.*,
           u.first_name, u.last_name, u.email, u.contact_number,
           u.department_id, d.name AS department_name
    FROM employees e
    JOIN users u ON u.id = e.user_id
    LEFT JOIN departments d ON d.id = u.department_id
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeListItem>, AppError> {
        let sql = format!("{} ORDER BY e.created_at DESC", SELECT_LIST_ITEM);
        let rows = sqlx::query_as::<_, EmployeeListItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: i32) -> Result<Option<EmployeeListItem>, AppError> {
        let sql = format!("{} WHERE e.id = $1", SELECT_LIST_ITEM);
        let row = sqlx::query_as::<_, EmployeeListItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_row(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_by_department(&self, department_id: i32) -> Result<Vec<EmployeeListItem>, AppError> {
        let sql = format!("{} WHERE u.department_id = $1 ORDER BY u.first_name", SELECT_LIST_ITEM);
        let rows = sqlx::query_as::<_, EmployeeListItem>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // Case-insensitive substring over the identifiers and the user's name/email
    pub async fn search(&self, query: &str) -> Result<Vec<EmployeeListItem>, AppError> {
        let sql = format!(
            r#"{}
            WHERE e.employee_id ILIKE $1
               OR e.ni_number ILIKE $1
               OR u.email ILIKE $1
               OR u.first_name ILIKE $1
               OR u.last_name ILIKE $1
            ORDER BY e.created_at DESC
            "#,
            SELECT_LIST_ITEM
        );
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, EmployeeListItem>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn employee_id_taken(&self, employee_id: &str) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE employee_id = $1)",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn ni_number_taken(&self, ni_number: &str) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE ni_number = $1)",
        )
        .bind(ni_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Active users without an employee record.
    pub async fn available_users(&self) -> Result<Vec<AvailableUser>, AppError> {
        let users = sqlx::query_as::<_, AvailableUser>(
            r#"
            SELECT u.email AS label,
                   u.id AS value,
                   TRIM(u.first_name || ' ' || COALESCE(u.last_name, '')) AS name
            FROM users u
            WHERE u.status = TRUE
              AND NOT EXISTS (SELECT 1 FROM employees e WHERE e.user_id = u.id)
            ORDER BY u.first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn create(&self, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                user_id, employee_id, date_of_birth, nationality, emergency_contact,
                ni_number, visa_type, e_visa_share_code, visa_start_date, visa_end_date,
                bank_name, account_number, sort_code, account_holder,
                passport_photo, employment_contract, right_to_work_document, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    COALESCE($18, 'Active'::employee_status))
            RETURNING *
            "#,
        )
        .bind(payload.user_id)
        .bind(&payload.employee_id)
        .bind(payload.date_of_birth)
        .bind(&payload.nationality)
        .bind(&payload.emergency_contact)
        .bind(&payload.ni_number)
        .bind(&payload.visa_type)
        .bind(&payload.e_visa_share_code)
        .bind(payload.visa_start_date)
        .bind(payload.visa_end_date)
        .bind(&payload.bank_name)
        .bind(&payload.account_number)
        .bind(&payload.sort_code)
        .bind(&payload.account_holder)
        .bind(&payload.passport_photo)
        .bind(&payload.employment_contract)
        .bind(&payload.right_to_work_document)
        .bind(payload.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    pub async fn update(&self, id: i32, changes: &UpdateEmployeePayload) -> Result<Option<Employee>, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                employee_id            = COALESCE($2, employee_id),
                date_of_birth          = COALESCE($3, date_of_birth),
                nationality            = COALESCE($4, nationality),
                emergency_contact      = COALESCE($5, emergency_contact),
                ni_number              = COALESCE($6, ni_number),
                visa_type              = COALESCE($7, visa_type),
                e_visa_share_code      = COALESCE($8, e_visa_share_code),
                visa_start_date        = COALESCE($9, visa_start_date),
                visa_end_date          = COALESCE($10, visa_end_date),
                bank_name              = COALESCE($11, bank_name),
                account_number         = COALESCE($12, account_number),
                sort_code              = COALESCE($13, sort_code),
                account_holder         = COALESCE($14, account_holder),
                passport_photo         = COALESCE($15, passport_photo),
                employment_contract    = COALESCE($16, employment_contract),
                right_to_work_document = COALESCE($17, right_to_work_document),
                status                 = COALESCE($18, status),
                updated_at             = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.employee_id)
        .bind(changes.date_of_birth)
        .bind(&changes.nationality)
        .bind(&changes.emergency_contact)
        .bind(&changes.ni_number)
        .bind(&changes.visa_type)
        .bind(&changes.e_visa_share_code)
        .bind(changes.visa_start_date)
        .bind(changes.visa_end_date)
        .bind(&changes.bank_name)
        .bind(&changes.account_number)
        .bind(&changes.sort_code)
        .bind(&changes.account_holder)
        .bind(&changes.passport_photo)
        .bind(&changes.employment_contract)
        .bind(&changes.right_to_work_document)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Active employees, newest first, for the dashboard
    pub async fn dashboard_rows(&self) -> Result<Vec<DashboardEmployee>, AppError> {
        let rows = sqlx::query_as::<_, DashboardEmployee>(
            r#"
            SELECT e.id, u.first_name, u.last_name, d.name AS department_name,
                   e.visa_type, e.visa_end_date, e.status
            FROM employees e
            JOIN users u ON u.id = e.user_id
            LEFT JOIN departments d ON d.id = u.department_id
            WHERE e.status = 'Active'
            ORDER BY e.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
