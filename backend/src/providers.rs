//! Sample data for previews.
//!
//! Tenant, member and contract records live in other parts of the system.
//! Previews reach them through `SampleDataProvider`, which is the only
//! place a preview may wait on something outside the engine. When nothing
//! real is available the synthetic records below stand in.

use crate::database::{Database, DbError};
use async_trait::async_trait;
use chrono::NaiveDate;
use common::model::context::{ContractRecord, MemberRecord, TenantRecord};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("sample data unavailable: {0}")]
    Unavailable(String),
    #[error("sample data lookup aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait SampleDataProvider: Send + Sync {
    async fn tenant(&self, tenant_id: &str) -> Result<Option<TenantRecord>, ProviderError>;

    /// The member of the tenant with the most recent activity.
    async fn most_recent_member(&self, tenant_id: &str)
        -> Result<Option<MemberRecord>, ProviderError>;

    async fn latest_contract(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> Result<Option<ContractRecord>, ProviderError>;
}

/// Reads the membership tables of the shared database.
///
/// Queries run on the blocking pool, so a caller's timeout still fires while
/// the connection is busy with another request.
pub struct DatabaseSampleProvider {
    db: Arc<Database>,
}

impl DatabaseSampleProvider {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn query<T, F>(&self, query: F) -> Result<T, ProviderError>
    where
        F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        Ok(tokio::task::spawn_blocking(move || query(db.as_ref())).await??)
    }
}

#[async_trait]
impl SampleDataProvider for DatabaseSampleProvider {
    async fn tenant(&self, tenant_id: &str) -> Result<Option<TenantRecord>, ProviderError> {
        let tenant_id = tenant_id.to_string();
        self.query(move |db| db.get_tenant(&tenant_id)).await
    }

    async fn most_recent_member(
        &self,
        tenant_id: &str,
    ) -> Result<Option<MemberRecord>, ProviderError> {
        let tenant_id = tenant_id.to_string();
        self.query(move |db| db.most_recently_active_member(&tenant_id))
            .await
    }

    async fn latest_contract(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> Result<Option<ContractRecord>, ProviderError> {
        let tenant_id = tenant_id.to_string();
        let member_id = member_id.to_string();
        self.query(move |db| db.latest_contract(&tenant_id, &member_id))
            .await
    }
}

pub fn synthetic_tenant(tenant_id: &str) -> TenantRecord {
    TenantRecord {
        id: tenant_id.to_string(),
        name: "Musterdojo".to_string(),
        legal_name: Some("Musterdojo e.V.".to_string()),
        street: Some("Musterstraße 1".to_string()),
        postal_code: Some("12345".to_string()),
        city: Some("Musterstadt".to_string()),
        email: Some("info@musterdojo.example".to_string()),
        phone: Some("0123 456789".to_string()),
        website: Some("https://musterdojo.example".to_string()),
        creditor_id: Some("DE98ZZZ09999999999".to_string()),
    }
}

pub fn synthetic_member() -> MemberRecord {
    MemberRecord {
        id: "sample-member".to_string(),
        member_number: Some("M-0000".to_string()),
        first_name: "Max".to_string(),
        last_name: "Mustermann".to_string(),
        email: Some("max.mustermann@example.org".to_string()),
        phone: Some("0123 987654".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
        street: Some("Beispielweg 2".to_string()),
        postal_code: Some("12345".to_string()),
        city: Some("Musterstadt".to_string()),
        last_active_at: None,
    }
}

pub fn synthetic_contract(member_id: &str) -> ContractRecord {
    ContractRecord {
        id: "sample-contract".to_string(),
        member_id: member_id.to_string(),
        contract_number: Some("V-0000".to_string()),
        tariff_name: "Standard".to_string(),
        monthly_fee_cents: 4990,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        end_date: None,
        minimum_term_months: Some(12),
        notice_period_months: Some(3),
        iban: Some("DE02120300000000202051".to_string()),
        mandate_reference: Some("MANDAT-0000".to_string()),
    }
}
