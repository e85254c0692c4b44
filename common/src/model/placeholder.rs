//! The placeholder catalog: every token a template may embed.
//!
//! Tokens are written `{{namespace.field}}`. The catalog is static; a copy of
//! it is stored with each template at save time so that rendering keeps
//! working against the vocabulary the author actually saw.

use crate::model::legal::LegalDocumentType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderNamespace {
    Member,
    Contract,
    Tenant,
    System,
    /// Transclusion of active legal documents.
    Legal,
}

impl PlaceholderNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderNamespace::Member => "member",
            PlaceholderNamespace::Contract => "contract",
            PlaceholderNamespace::Tenant => "tenant",
            PlaceholderNamespace::System => "system",
            PlaceholderNamespace::Legal => "legal",
        }
    }
}

impl fmt::Display for PlaceholderNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceholderNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(PlaceholderNamespace::Member),
            "contract" => Ok(PlaceholderNamespace::Contract),
            "tenant" => Ok(PlaceholderNamespace::Tenant),
            "system" => Ok(PlaceholderNamespace::System),
            "legal" => Ok(PlaceholderNamespace::Legal),
            other => Err(format!("unknown placeholder namespace '{}'", other)),
        }
    }
}

/// Value kind of a placeholder, used for formatting and editor hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderType {
    Text,
    Number,
    Currency,
    Email,
    Date,
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDefinition {
    pub namespace: PlaceholderNamespace,
    pub field: String,
    pub label: String,
    pub placeholder_type: PlaceholderType,
}

impl PlaceholderDefinition {
    fn new(
        namespace: PlaceholderNamespace,
        field: &str,
        label: &str,
        placeholder_type: PlaceholderType,
    ) -> Self {
        Self {
            namespace,
            field: field.to_string(),
            label: label.to_string(),
            placeholder_type,
        }
    }

    /// `namespace.field`
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.field)
    }

    /// The token as it appears in template content.
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.key())
    }
}

/// Returns the full placeholder catalog.
pub fn catalog() -> Vec<PlaceholderDefinition> {
    use PlaceholderNamespace::*;
    use PlaceholderType::*;

    let mut entries = vec![
        PlaceholderDefinition::new(Member, "memberNumber", "Member number", Text),
        PlaceholderDefinition::new(Member, "firstName", "First name", Text),
        PlaceholderDefinition::new(Member, "lastName", "Last name", Text),
        PlaceholderDefinition::new(Member, "fullName", "Full name", Text),
        PlaceholderDefinition::new(Member, "email", "Email", Email),
        PlaceholderDefinition::new(Member, "phone", "Phone", Text),
        PlaceholderDefinition::new(Member, "birthDate", "Date of birth", Date),
        PlaceholderDefinition::new(Member, "street", "Street", Text),
        PlaceholderDefinition::new(Member, "postalCode", "Postal code", Text),
        PlaceholderDefinition::new(Member, "city", "City", Text),
        PlaceholderDefinition::new(Contract, "contractNumber", "Contract number", Text),
        PlaceholderDefinition::new(Contract, "tariffName", "Tariff", Text),
        PlaceholderDefinition::new(Contract, "monthlyFee", "Monthly fee", Currency),
        PlaceholderDefinition::new(Contract, "startDate", "Start date", Date),
        PlaceholderDefinition::new(Contract, "endDate", "End date", Date),
        PlaceholderDefinition::new(Contract, "minimumTerm", "Minimum term (months)", Number),
        PlaceholderDefinition::new(Contract, "noticePeriod", "Notice period (months)", Number),
        PlaceholderDefinition::new(Contract, "iban", "IBAN", Text),
        PlaceholderDefinition::new(Contract, "mandateReference", "SEPA mandate reference", Text),
        PlaceholderDefinition::new(Tenant, "name", "Dojo name", Text),
        PlaceholderDefinition::new(Tenant, "legalName", "Legal entity name", Text),
        PlaceholderDefinition::new(Tenant, "street", "Street", Text),
        PlaceholderDefinition::new(Tenant, "postalCode", "Postal code", Text),
        PlaceholderDefinition::new(Tenant, "city", "City", Text),
        PlaceholderDefinition::new(Tenant, "email", "Email", Email),
        PlaceholderDefinition::new(Tenant, "phone", "Phone", Text),
        PlaceholderDefinition::new(Tenant, "website", "Website", Text),
        PlaceholderDefinition::new(Tenant, "creditorId", "SEPA creditor id", Text),
        PlaceholderDefinition::new(System, "date", "Current date", Date),
        PlaceholderDefinition::new(System, "year", "Current year", Number),
        PlaceholderDefinition::new(System, "dateTime", "Current date and time", Text),
    ];

    entries.extend(LegalDocumentType::ALL.into_iter().map(|t| {
        PlaceholderDefinition::new(Legal, t.placeholder_field(), t.as_str(), Markup)
    }));

    entries
}
