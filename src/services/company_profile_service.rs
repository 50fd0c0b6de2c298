// src/services/company_profile_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::CompanyProfileRepository,
    models::company_profile::{CompanyProfileView, SaveCompanyProfilePayload},
};

#[derive(Clone)]
pub struct CompanyProfileService {
    repo: CompanyProfileRepository,
    pool: PgPool,
}

impl CompanyProfileService {
    pub fn new(repo: CompanyProfileRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn get(&self) -> Result<Option<CompanyProfileView>, AppError> {
        let Some(profile) = self.repo.find().await? else {
            return Ok(None);
        };
        let registration_details = self.repo.details(profile.id).await?;
        Ok(Some(CompanyProfileView { profile, registration_details }))
    }

    /// Upserts the single profile and replaces its registration details
    /// wholesale, all in one transaction.
    pub async fn save(&self, payload: &SaveCompanyProfilePayload) -> Result<CompanyProfileView, AppError> {
        let mut tx = self.pool.begin().await?;

        let profile = self.repo.upsert(&mut *tx, payload).await?;
        self.repo.clear_details(&mut *tx, profile.id).await?;

        let mut registration_details = Vec::with_capacity(payload.registration_details.len());
        for (position, detail) in payload.registration_details.iter().enumerate() {
            let row = self
                .repo
                .insert_detail(&mut *tx, profile.id, position as i32, detail)
                .await?;
            registration_details.push(row);
        }

        tx.commit().await?;

        tracing::info!(
            profile_id = profile.id,
            details = registration_details.len(),
            "company profile saved"
        );
        Ok(CompanyProfileView { profile, registration_details })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company_profile::RegistrationDetailInput;

    fn detail(label: &str, value: &str) -> RegistrationDetailInput {
        RegistrationDetailInput { label: label.into(), value: value.into() }
    }

    #[sqlx::test]
    async fn saving_twice_keeps_one_profile_and_replaces_details(pool: PgPool) {
        let service = CompanyProfileService::new(CompanyProfileRepository::new(pool.clone()), pool);
        assert!(service.get().await.unwrap().is_none());

        let first = service
            .save(&SaveCompanyProfilePayload {
                company_name: Some("Acme Care".into()),
                registration_details: vec![detail("CQC", "1-234"), detail("VAT", "GB1")],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.registration_details.len(), 2);

        let second = service
            .save(&SaveCompanyProfilePayload {
                company_name: Some("Acme Care Ltd".into()),
                registration_details: vec![detail("Charity", "42")],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.profile.id, first.profile.id);

        let stored = service.get().await.unwrap().unwrap();
        assert_eq!(stored.profile.company_name.as_deref(), Some("Acme Care Ltd"));
        let labels: Vec<_> = stored.registration_details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Charity"]);
    }
}
