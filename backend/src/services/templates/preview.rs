//! # Template Preview Service
//!
//! Two kinds of preview share one entry point:
//!
//! * **Saved** (`template_id`): the stored markup is rendered against the
//!   tenant's most recently active member and that member's latest contract.
//!   The lookups go through the `SampleDataProvider` and are bounded by the
//!   configured preview timeout. Whatever is missing, slow or failing is
//!   replaced by synthetic records, so a preview always renders.
//! * **Unsaved** (`content`): the block tree is flattened as written, without
//!   any substitution, and a notice is appended saying so.

use crate::engine::resolver::tokens;
use crate::error::ServiceError;
use crate::providers::{
    synthetic_contract, synthetic_member, synthetic_tenant, ProviderError, SampleDataProvider,
};
use crate::services::legal_documents::select_active;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::context::{ContractRecord, MemberRecord, RenderContext, TenantRecord};
use common::model::legal::LegalDocumentType;
use common::model::placeholder::PlaceholderNamespace;
use common::model::render::{RenderedDocument, SampleSource};
use common::model::template::DocumentTemplate;
use common::requests::{PreviewRequest, TenantQuery};
use log::{debug, warn};
use tokio::time::timeout;

pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<PreviewRequest>,
) -> Result<HttpResponse, ServiceError> {
    let rendered = preview(&state, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

pub async fn process_saved(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<TenantQuery>,
) -> Result<HttpResponse, ServiceError> {
    let request = PreviewRequest {
        tenant_id: query.into_inner().tenant_id,
        template_id: Some(path.into_inner()),
        content: None,
    };
    let rendered = preview(&state, request).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

pub async fn preview(
    state: &AppState,
    request: PreviewRequest,
) -> Result<RenderedDocument, ServiceError> {
    if request.tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation("tenant_id is required".to_string()));
    }

    match (request.template_id, request.content) {
        (Some(template_id), None) => {
            let template = match state.db.get_template(&template_id)? {
                Some(t) if t.tenant_id == request.tenant_id => t,
                _ => return Err(ServiceError::not_found("template", template_id)),
            };
            preview_saved(state, &template).await
        }
        (None, Some(content)) => Ok(state.renderer.render_literal(&content)),
        (Some(_), Some(_)) => Err(ServiceError::Validation(
            "either template_id or content must be given, not both".to_string(),
        )),
        (None, None) => Err(ServiceError::Validation(
            "either template_id or content is required".to_string(),
        )),
    }
}

async fn preview_saved(
    state: &AppState,
    template: &DocumentTemplate,
) -> Result<RenderedDocument, ServiceError> {
    let sample = fetch_sample(state, &template.tenant_id).await;

    let mut context = RenderContext::empty(Utc::now())
        .with_tenant(sample.tenant)
        .with_member(sample.member)
        .with_contract(sample.contract);

    for document_type in referenced_legal_documents(template) {
        match select_active(&state.db, &template.tenant_id, document_type) {
            Ok(version) => context = context.with_legal_document(document_type, version.content),
            Err(ServiceError::NotFound { .. }) => {
                debug!(
                    "Tenant {} has no active {} document, leaving it empty",
                    template.tenant_id, document_type
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(state.renderer.render(template, &context, sample.source))
}

/// Legal document types transcluded by the template, through blocks or inline tokens.
fn referenced_legal_documents(template: &DocumentTemplate) -> Vec<LegalDocumentType> {
    let mut types = template.structured_content.referenced_legal_documents();
    let legal_prefix = format!("{}.", PlaceholderNamespace::Legal);
    for key in tokens(&template.derived_markup) {
        let Some(field) = key.strip_prefix(&legal_prefix) else {
            continue;
        };
        if let Some(document_type) = LegalDocumentType::from_placeholder_field(field) {
            if !types.contains(&document_type) {
                types.push(document_type);
            }
        }
    }
    types
}

struct Sample {
    tenant: TenantRecord,
    member: MemberRecord,
    contract: ContractRecord,
    source: SampleSource,
}

impl Sample {
    fn synthetic(tenant_id: &str) -> Self {
        let member = synthetic_member();
        let contract = synthetic_contract(&member.id);
        Sample {
            tenant: synthetic_tenant(tenant_id),
            member,
            contract,
            source: SampleSource::Synthetic,
        }
    }
}

type LiveRecords = (
    Option<TenantRecord>,
    Option<MemberRecord>,
    Option<ContractRecord>,
);

async fn live_records(
    provider: &dyn SampleDataProvider,
    tenant_id: &str,
) -> Result<LiveRecords, ProviderError> {
    let tenant = provider.tenant(tenant_id).await?;
    let member = provider.most_recent_member(tenant_id).await?;
    let contract = match &member {
        Some(m) => provider.latest_contract(tenant_id, &m.id).await?,
        None => None,
    };
    Ok((tenant, member, contract))
}

async fn fetch_sample(state: &AppState, tenant_id: &str) -> Sample {
    let lookup = live_records(state.provider.as_ref(), tenant_id);
    match timeout(state.preview_timeout, lookup).await {
        Ok(Ok((tenant, member, contract))) => {
            let source = if tenant.is_some() && member.is_some() && contract.is_some() {
                SampleSource::Live
            } else {
                debug!("Incomplete sample data for tenant {}, filling in", tenant_id);
                SampleSource::Synthetic
            };
            let tenant = tenant.unwrap_or_else(|| synthetic_tenant(tenant_id));
            let member = member.unwrap_or_else(synthetic_member);
            let contract = contract.unwrap_or_else(|| synthetic_contract(&member.id));
            Sample {
                tenant,
                member,
                contract,
                source,
            }
        }
        Ok(Err(e)) => {
            warn!("Sample data lookup for tenant {} failed: {}", tenant_id, e);
            Sample::synthetic(tenant_id)
        }
        Err(_) => {
            warn!(
                "Sample data lookup for tenant {} timed out after {:?}",
                tenant_id, state.preview_timeout
            );
            Sample::synthetic(tenant_id)
        }
    }
}
