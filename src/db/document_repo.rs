// src/db/document_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::document::{DocumentRow, DocumentSummary, DocumentType, NewDocument},
};

// File data is never selected here; lists stay light even with large blobs.
const SELECT_SUMMARY: &str = r#"
    SELECT doc.id, doc.file_name, doc.document_type, doc.file_type, doc.file_size,
           doc.user_id, doc.applicant_name, doc.applicant_email, doc.status,
           doc.created_at, doc.updated_at,
           COALESCE(TRIM(u.first_name || ' ' || COALESCE(u.last_name, '')), doc.applicant_name) AS owner_name,
           COALESCE(u.email, doc.applicant_email) AS owner_email
    FROM documents doc
    LEFT JOIN users u ON u.id = doc.user_id
"#;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, doc: NewDocument) -> Result<i32, AppError> {
        let (user_id, applicant_name, applicant_email) = doc.owner.into_columns();
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO documents (
                file_name, document_type, file_data, file_type, file_size,
                user_id, applicant_name, applicant_email, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'Active')
            RETURNING id
            "#,
        )
        .bind(doc.file_name)
        .bind(doc.document_type)
        .bind(doc.file_data)
        .bind(doc.file_type)
        .bind(doc.file_size)
        .bind(user_id)
        .bind(applicant_name)
        .bind(applicant_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn find_summary(&self, id: i32) -> Result<Option<DocumentSummary>, AppError> {
        let sql = format!("{} WHERE doc.id = $1", SELECT_SUMMARY);
        let row = sqlx::query_as::<_, DocumentSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_employee_documents(
        &self,
        document_type: Option<DocumentType>,
        user_id: Option<i32>,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        let sql = format!(
            r#"{}
            WHERE doc.status = 'Active'
              AND doc.user_id IS NOT NULL
              AND ($1::document_type IS NULL OR doc.document_type = $1)
              AND ($2::int IS NULL OR doc.user_id = $2)
            ORDER BY doc.created_at DESC
            "#,
            SELECT_SUMMARY
        );
        let rows = sqlx::query_as::<_, DocumentSummary>(&sql)
            .bind(document_type)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_applicant_documents(
        &self,
        document_type: Option<DocumentType>,
        applicant_name: Option<&str>,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        let sql = format!(
            r#"{}
            WHERE doc.status = 'Active'
              AND doc.applicant_name IS NOT NULL
              AND ($1::document_type IS NULL OR doc.document_type = $1)
              AND ($2::text IS NULL OR doc.applicant_name ILIKE '%' || $2 || '%')
            ORDER BY doc.created_at DESC
            "#,
            SELECT_SUMMARY
        );
        let rows = sqlx::query_as::<_, DocumentSummary>(&sql)
            .bind(document_type)
            .bind(applicant_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Full row, file data included; only Active documents are visible.
    pub async fn find_active(&self, id: i32) -> Result<Option<DocumentRow>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT doc.*,
                   u.first_name AS user_first_name,
                   u.last_name  AS user_last_name,
                   u.email      AS user_email
            FROM documents doc
            LEFT JOIN users u ON u.id = doc.user_id
            WHERE doc.id = $1 AND doc.status = 'Active'
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Flips the status to Deleted; `false` when the id is unknown.
    pub async fn soft_delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE documents SET status = 'Deleted', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
