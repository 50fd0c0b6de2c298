// src/models/company_profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: i32,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_email: Option<String>,
    pub company_contact: Option<String>,
    pub company_website: Option<String>,
    pub company_facebook: Option<String>,
    pub payee_code: Option<String>,
    pub account_office_reference: Option<String>,
    pub company_tax_code: Option<String>,
    pub local_authority_name: Option<String>,
    pub local_police_contact: Option<String>,
    pub maintain_emergency: Option<String>,
    pub registered_manager_contact_number: Option<String>,
    pub registered_manager_name: Option<String>,
    pub company_office_hours: Option<String>,
    pub registered_provider_name: Option<String>,
    pub media_enquiry_handling_person: Option<String>,
    pub responsible_for_complaints: Option<String>,
    pub security_system_provider: Option<String>,
    pub security_alarm_contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    pub id: i32,
    pub company_profile_id: i32,
    pub label: String,
    pub value: String,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileView {
    #[serde(flatten)]
    pub profile: CompanyProfile,
    pub registration_details: Vec<RegistrationDetail>,
}

// --- PAYLOAD ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegistrationDetailInput {
    #[validate(length(min = 1, message = "Registration detail label is required"))]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

// The whole profile is replaced on every save
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCompanyProfilePayload {
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub company_email: Option<String>,
    pub company_contact: Option<String>,
    pub company_website: Option<String>,
    pub company_facebook: Option<String>,
    pub payee_code: Option<String>,
    pub account_office_reference: Option<String>,
    pub company_tax_code: Option<String>,
    pub local_authority_name: Option<String>,
    pub local_police_contact: Option<String>,
    pub maintain_emergency: Option<String>,
    pub registered_manager_contact_number: Option<String>,
    pub registered_manager_name: Option<String>,
    pub company_office_hours: Option<String>,
    pub registered_provider_name: Option<String>,
    pub media_enquiry_handling_person: Option<String>,
    pub responsible_for_complaints: Option<String>,
    pub security_system_provider: Option<String>,
    pub security_alarm_contact_number: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub registration_details: Vec<RegistrationDetailInput>,
}
