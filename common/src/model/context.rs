//! Records bound to placeholder namespaces for one render call.
//!
//! Tenant, member and contract data belong to other parts of the system; the
//! engine only reads them. None of these types is ever persisted by the engine.

use crate::model::legal::LegalDocumentType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// SEPA creditor identifier.
    pub creditor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,
    pub member_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub last_active_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: String,
    pub member_id: String,
    pub contract_number: Option<String>,
    pub tariff_name: String,
    pub monthly_fee_cents: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub minimum_term_months: Option<i64>,
    pub notice_period_months: Option<i64>,
    pub iban: Option<String>,
    pub mandate_reference: Option<String>,
}

/// Everything a single render may substitute. Missing records are allowed;
/// their tokens fall back instead of failing the render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub member: Option<MemberRecord>,
    pub contract: Option<ContractRecord>,
    pub tenant: Option<TenantRecord>,
    pub now: DateTime<Utc>,
    /// Content of the active legal document per type, for transclusion.
    pub legal_documents: HashMap<LegalDocumentType, String>,
}

impl RenderContext {
    /// A context with only the system clock bound.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            member: None,
            contract: None,
            tenant: None,
            now,
            legal_documents: HashMap::new(),
        }
    }

    pub fn with_member(mut self, member: MemberRecord) -> Self {
        self.member = Some(member);
        self
    }

    pub fn with_contract(mut self, contract: ContractRecord) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_tenant(mut self, tenant: TenantRecord) -> Self {
        self.tenant = Some(tenant);
        self
    }

    pub fn with_legal_document(
        mut self,
        document_type: LegalDocumentType,
        content: impl Into<String>,
    ) -> Self {
        self.legal_documents.insert(document_type, content.into());
        self
    }
}
