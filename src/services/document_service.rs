// src/services/document_service.rs

use crate::{
    common::error::AppError,
    db::{DocumentRepository, UserRepository},
    models::{
        document::{
            strip_data_url, ApplicantDocumentFilter, DocumentDetail, DocumentOwner, DocumentSummary,
            EmployeeDocumentFilter, NewDocument, UploadApplicantDocumentPayload,
            UploadEmployeeDocumentPayload,
        },
        user::AvailableUser,
    },
};

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    user_repo: UserRepository,
}

impl DocumentService {
    pub fn new(repo: DocumentRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn upload_for_employee(
        &self,
        payload: UploadEmployeeDocumentPayload,
    ) -> Result<DocumentSummary, AppError> {
        if self.user_repo.find_by_id(payload.user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }

        self.store(NewDocument {
            file_name: payload.file_name,
            document_type: payload.document_type,
            file_data: strip_data_url(payload.file_data),
            file_type: payload.file_type,
            file_size: payload.file_size,
            owner: DocumentOwner::Employee { user_id: payload.user_id },
        })
        .await
    }

    pub async fn upload_for_applicant(
        &self,
        payload: UploadApplicantDocumentPayload,
    ) -> Result<DocumentSummary, AppError> {
        self.store(NewDocument {
            file_name: payload.file_name,
            document_type: payload.document_type,
            file_data: strip_data_url(payload.file_data),
            file_type: payload.file_type,
            file_size: payload.file_size,
            owner: DocumentOwner::Applicant {
                name: payload.applicant_name,
                email: payload.applicant_email.filter(|e| !e.is_empty()),
            },
        })
        .await
    }

    async fn store(&self, doc: NewDocument) -> Result<DocumentSummary, AppError> {
        let stored_len = doc.file_data.len();
        let id = self.repo.insert(doc).await?;

        tracing::info!(document_id = id, stored_len, "document uploaded");

        self.repo
            .find_summary(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("document {} missing right after insert", id).into())
    }

    pub async fn list_employee_documents(
        &self,
        filter: &EmployeeDocumentFilter,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        self.repo.list_employee_documents(filter.document_type, filter.user_id).await
    }

    pub async fn list_applicant_documents(
        &self,
        filter: &ApplicantDocumentFilter,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        let name = filter.applicant_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        self.repo.list_applicant_documents(filter.document_type, name).await
    }

    pub async fn get(&self, id: i32) -> Result<DocumentDetail, AppError> {
        let row = self
            .repo
            .find_active(id)
            .await?
            .ok_or(AppError::NotFound("Document not found"))?;

        let (stored_len, declared) = (row.file_data.len(), row.file_size);
        DocumentDetail::from_row(row).inspect_err(|err| {
            if matches!(err, AppError::CorruptedDocument) {
                tracing::warn!(document_id = id, stored_len, declared, "refusing truncated document");
            }
        })
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::NotFound("Document not found"));
        }
        tracing::info!(document_id = id, "document deleted");
        Ok(())
    }

    pub async fn available_users(&self) -> Result<Vec<AvailableUser>, AppError> {
        self.user_repo.list_active_options().await
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::{
        models::{document::DocumentType, user::UserRole},
        test_support::insert_user,
    };

    fn service(pool: &PgPool) -> DocumentService {
        DocumentService::new(DocumentRepository::new(pool.clone()), UserRepository::new(pool.clone()))
    }

    fn upload(user_id: i32) -> UploadEmployeeDocumentPayload {
        UploadEmployeeDocumentPayload {
            file_name: "hello.txt".into(),
            document_type: DocumentType::Cv,
            file_data: "data:text/plain;base64,aGVsbG8=".into(),
            file_type: "text/plain".into(),
            file_size: 5,
            user_id,
        }
    }

    #[sqlx::test]
    async fn stored_document_is_served_then_hidden_after_delete(pool: PgPool) {
        let user_id = insert_user(&pool, "filer", UserRole::Employee).await;
        let documents = service(&pool);

        let summary = documents.upload_for_employee(upload(user_id)).await.unwrap();
        assert_eq!(summary.user_id, Some(user_id));

        let detail = documents.get(summary.id).await.unwrap();
        assert_eq!(detail.file_data, "data:text/plain;base64,aGVsbG8=");
        assert!(matches!(detail.owner, DocumentOwner::Employee { user_id: owner } if owner == user_id));

        documents.delete(summary.id).await.unwrap();
        assert!(matches!(documents.get(summary.id).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test]
    async fn upload_for_unknown_user_is_not_found(pool: PgPool) {
        let result = service(&pool).upload_for_employee(upload(9999)).await;
        assert!(matches!(result, Err(AppError::NotFound("User not found"))));
    }
}
