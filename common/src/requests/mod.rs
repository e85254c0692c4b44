use crate::model::block::StructuredContent;
use crate::model::legal::LegalDocumentType;
use crate::model::template::TemplateType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query string of the template listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTemplatesQuery {
    pub tenant_id: String,
    pub template_type: Option<TemplateType>,
    /// Only return default templates.
    #[serde(default)]
    pub default_only: bool,
}

/// Create (no `id`) or whole-document replace (with `id`) of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub tenant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub template_type: TemplateType,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub structured_content: StructuredContent,
}

/// Preview of either a saved template (`template_id`) or unsaved content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub tenant_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub content: Option<StructuredContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRequest {
    pub target_tenant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCopyRequest {
    pub ids: Vec<String>,
    pub target_tenant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalDocumentQuery {
    pub tenant_id: String,
    pub document_type: LegalDocumentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishLegalDocumentRequest {
    pub tenant_id: String,
    pub document_type: LegalDocumentType,
    pub version_label: String,
    pub title: String,
    pub content: String,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    /// Make this the active version right away.
    #[serde(default)]
    pub activate: bool,
}
