use crate::model::block::StructuredContent;
use crate::model::placeholder::PlaceholderDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Contract,
    SepaMandate,
    Terms,
    Privacy,
    Termination,
    Custom,
}

impl TemplateType {
    pub const ALL: [TemplateType; 6] = [
        TemplateType::Contract,
        TemplateType::SepaMandate,
        TemplateType::Terms,
        TemplateType::Privacy,
        TemplateType::Termination,
        TemplateType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Contract => "contract",
            TemplateType::SepaMandate => "sepa_mandate",
            TemplateType::Terms => "terms",
            TemplateType::Privacy => "privacy",
            TemplateType::Termination => "termination",
            TemplateType::Custom => "custom",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown template type '{}'", s))
    }
}

/// A reusable, tenant-owned document template.
///
/// `derived_markup` and `derived_stylesheet` are always the flattening of
/// `structured_content` as of the last save; they are never edited on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub template_type: TemplateType,
    pub version: i64,
    pub is_default: bool,
    pub structured_content: StructuredContent,
    pub derived_markup: String,
    pub derived_stylesheet: String,
    /// md5 hex digest of the derived markup and stylesheet.
    pub content_hash: String,
    pub placeholder_schema_snapshot: Vec<PlaceholderDefinition>,
    pub copied_from: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// List entry returned by the template listing, without any content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub template_type: TemplateType,
    pub version: i64,
    pub is_default: bool,
    pub content_hash: String,
    pub updated_at: i64,
}

impl From<&DocumentTemplate> for TemplateSummary {
    fn from(t: &DocumentTemplate) -> Self {
        Self {
            id: t.id.clone(),
            tenant_id: t.tenant_id.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
            template_type: t.template_type,
            version: t.version,
            is_default: t.is_default,
            content_hash: t.content_hash.clone(),
            updated_at: t.updated_at,
        }
    }
}

/// Result of a save: the persisted template plus authoring hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub template: DocumentTemplate,
    /// Tokens used in the content that the placeholder catalog does not know.
    pub unknown_placeholders: Vec<String>,
}
