//! Cross-tenant duplication of legal document versions.
//!
//! The copy keeps label, title, content and validity dates, lands inactive and
//! records `copied_from`. A label the target already uses for the same
//! document type is rejected for that item.

use crate::database::{Activation, Database, NewLegalDocumentVersion};
use crate::error::ServiceError;
use crate::services::batch::{check_target_tenant, copy_each};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::legal::LegalDocumentVersion;
use common::requests::{BatchCopyRequest, CopyRequest};
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CopyRequest>,
) -> Result<HttpResponse, ServiceError> {
    let copy = copy_legal_document(&state.db, &path.into_inner(), &payload.target_tenant_id)?;
    Ok(HttpResponse::Created().json(copy))
}

pub async fn process_batch(
    state: web::Data<AppState>,
    payload: web::Json<BatchCopyRequest>,
) -> Result<HttpResponse, ServiceError> {
    let payload = payload.into_inner();
    if payload.target_tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation(
            "target_tenant_id is required".to_string(),
        ));
    }
    let report = copy_each(
        "legal document",
        &payload.ids,
        &payload.target_tenant_id,
        |id| copy_legal_document(&state.db, id, &payload.target_tenant_id).map(|copy| copy.id),
    );
    Ok(HttpResponse::Ok().json(report))
}

pub fn copy_legal_document(
    db: &Database,
    version_id: &str,
    target_tenant_id: &str,
) -> Result<LegalDocumentVersion, ServiceError> {
    check_target_tenant(db, target_tenant_id)?;
    let source = db
        .get_legal_document_version(version_id)?
        .ok_or_else(|| ServiceError::not_found("legal document", version_id))?;

    let copy = db.insert_legal_document_version(&NewLegalDocumentVersion {
        tenant_id: target_tenant_id.to_string(),
        document_type: source.document_type,
        version_label: source.version_label.clone(),
        title: source.title.clone(),
        content: source.content.clone(),
        valid_from: source.valid_from,
        valid_until: source.valid_until,
        activation: Activation::Inactive,
        copied_from: Some(source.id.clone()),
    })?;
    info!(
        "Copied {} version '{}' of tenant {} to tenant {} as {}",
        source.document_type, source.version_label, source.tenant_id, target_tenant_id, copy.id
    );
    Ok(copy)
}
