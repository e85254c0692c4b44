use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of legal text a tenant publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalDocumentType {
    Terms,
    Privacy,
    WithdrawalNotice,
    HouseRules,
    CodeOfConduct,
    Liability,
    Other,
}

impl LegalDocumentType {
    pub const ALL: [LegalDocumentType; 7] = [
        LegalDocumentType::Terms,
        LegalDocumentType::Privacy,
        LegalDocumentType::WithdrawalNotice,
        LegalDocumentType::HouseRules,
        LegalDocumentType::CodeOfConduct,
        LegalDocumentType::Liability,
        LegalDocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LegalDocumentType::Terms => "terms",
            LegalDocumentType::Privacy => "privacy",
            LegalDocumentType::WithdrawalNotice => "withdrawal_notice",
            LegalDocumentType::HouseRules => "house_rules",
            LegalDocumentType::CodeOfConduct => "code_of_conduct",
            LegalDocumentType::Liability => "liability",
            LegalDocumentType::Other => "other",
        }
    }

    /// Field name used in `{{legal.<field>}}` transclusion tokens.
    pub fn placeholder_field(&self) -> &'static str {
        match self {
            LegalDocumentType::Terms => "terms",
            LegalDocumentType::Privacy => "privacy",
            LegalDocumentType::WithdrawalNotice => "withdrawalNotice",
            LegalDocumentType::HouseRules => "houseRules",
            LegalDocumentType::CodeOfConduct => "codeOfConduct",
            LegalDocumentType::Liability => "liability",
            LegalDocumentType::Other => "other",
        }
    }

    pub fn from_placeholder_field(field: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.placeholder_field() == field)
    }
}

impl fmt::Display for LegalDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalDocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown legal document type '{}'", s))
    }
}

/// A published, immutable revision of a tenant's legal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalDocumentVersion {
    pub id: String,
    pub tenant_id: String,
    pub document_type: LegalDocumentType,
    pub version_label: String,
    pub title: String,
    pub content: String,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    /// The version currently shown to users. At most one per tenant and type.
    pub active: bool,
    pub copied_from: Option<String>,
    pub created_at: i64,
}
