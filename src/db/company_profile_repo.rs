// src/db/company_profile_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::company_profile::{CompanyProfile, RegistrationDetail, RegistrationDetailInput, SaveCompanyProfilePayload},
};

#[derive(Clone)]
pub struct CompanyProfileRepository {
    pool: PgPool,
}

impl CompanyProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self) -> Result<Option<CompanyProfile>, AppError> {
        let profile = sqlx::query_as::<_, CompanyProfile>("SELECT * FROM company_profiles LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn details(&self, profile_id: i32) -> Result<Vec<RegistrationDetail>, AppError> {
        let rows = sqlx::query_as::<_, RegistrationDetail>(
            r#"
            SELECT id, company_profile_id, label, value, position
            FROM registration_details
            WHERE company_profile_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Creates the single profile row or overwrites it.
    pub async fn upsert<'e, E>(&self, executor: E, p: &SaveCompanyProfilePayload) -> Result<CompanyProfile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, CompanyProfile>(
            r#"
            INSERT INTO company_profiles (
                singleton, company_name, company_address, company_email, company_contact,
                company_website, company_facebook, payee_code, account_office_reference,
                company_tax_code, local_authority_name, local_police_contact, maintain_emergency,
                registered_manager_contact_number, registered_manager_name, company_office_hours,
                registered_provider_name, media_enquiry_handling_person, responsible_for_complaints,
                security_system_provider, security_alarm_contact_number
            )
            VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ON CONFLICT (singleton) DO UPDATE SET
                company_name                      = EXCLUDED.company_name,
                company_address                   = EXCLUDED.company_address,
                company_email                     = EXCLUDED.company_email,
                company_contact                   = EXCLUDED.company_contact,
                company_website                   = EXCLUDED.company_website,
                company_facebook                  = EXCLUDED.company_facebook,
                payee_code                        = EXCLUDED.payee_code,
                account_office_reference          = EXCLUDED.account_office_reference,
                company_tax_code                  = EXCLUDED.company_tax_code,
                local_authority_name              = EXCLUDED.local_authority_name,
                local_police_contact              = EXCLUDED.local_police_contact,
                maintain_emergency                = EXCLUDED.maintain_emergency,
                registered_manager_contact_number = EXCLUDED.registered_manager_contact_number,
                registered_manager_name           = EXCLUDED.registered_manager_name,
                company_office_hours              = EXCLUDED.company_office_hours,
                registered_provider_name          = EXCLUDED.registered_provider_name,
                media_enquiry_handling_person     = EXCLUDED.media_enquiry_handling_person,
                responsible_for_complaints        = EXCLUDED.responsible_for_complaints,
                security_system_provider          = EXCLUDED.security_system_provider,
                security_alarm_contact_number     = EXCLUDED.security_alarm_contact_number,
                updated_at                        = NOW()
            RETURNING *
            "#,
        )
        .bind(&p.company_name)
        .bind(&p.company_address)
        .bind(&p.company_email)
        .bind(&p.company_contact)
        .bind(&p.company_website)
        .bind(&p.company_facebook)
        .bind(&p.payee_code)
        .bind(&p.account_office_reference)
        .bind(&p.company_tax_code)
        .bind(&p.local_authority_name)
        .bind(&p.local_police_contact)
        .bind(&p.maintain_emergency)
        .bind(&p.registered_manager_contact_number)
        .bind(&p.registered_manager_name)
        .bind(&p.company_office_hours)
        .bind(&p.registered_provider_name)
        .bind(&p.media_enquiry_handling_person)
        .bind(&p.responsible_for_complaints)
        .bind(&p.security_system_provider)
        .bind(&p.security_alarm_contact_number)
        .fetch_one(executor)
        .await?;
        Ok(profile)
    }

    pub async fn clear_details<'e, E>(&self, executor: E, profile_id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM registration_details WHERE company_profile_id = $1")
            .bind(profile_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_detail<'e, E>(
        &self,
        executor: E,
        profile_id: i32,
        position: i32,
        detail: &RegistrationDetailInput,
    ) -> Result<RegistrationDetail, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, RegistrationDetail>(
            r#"
            INSERT INTO registration_details (company_profile_id, label, value, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_profile_id, label, value, position
            "#,
        )
        .bind(profile_id)
        .bind(&detail.label)
        .bind(&detail.value)
        .bind(position)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }
}
