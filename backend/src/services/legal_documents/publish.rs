//! `POST /api/legal_documents/publish` stores a new, immutable version.
//!
//! With `activate: true` the version takes over the active flag of its pair.
//! Otherwise it is active only when the pair had no active version yet, so a
//! tenant's first version of a document type is live right away.

use crate::database::{Activation, Database, NewLegalDocumentVersion};
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::legal::LegalDocumentVersion;
use common::requests::PublishLegalDocumentRequest;

pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<PublishLegalDocumentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let version = publish(&state.db, payload.into_inner())?;
    Ok(HttpResponse::Created().json(version))
}

pub fn publish(
    db: &Database,
    request: PublishLegalDocumentRequest,
) -> Result<LegalDocumentVersion, ServiceError> {
    let tenant_id = required("tenant_id", &request.tenant_id)?;
    let version_label = required("version_label", &request.version_label)?;
    let title = required("title", &request.title)?;
    if request.content.trim().is_empty() {
        return Err(ServiceError::Validation("content is required".to_string()));
    }
    if let Some(until) = request.valid_until {
        if until < request.valid_from {
            return Err(ServiceError::Validation(format!(
                "valid_until {} lies before valid_from {}",
                until, request.valid_from
            )));
        }
    }
    if !db.tenant_exists(&tenant_id)? {
        return Err(ServiceError::not_found("tenant", tenant_id));
    }

    let activation = if request.activate {
        Activation::Activate
    } else {
        Activation::IfNoneActive
    };
    Ok(db.insert_legal_document_version(&NewLegalDocumentVersion {
        tenant_id,
        document_type: request.document_type,
        version_label,
        title,
        content: request.content,
        valid_from: request.valid_from,
        valid_until: request.valid_until,
        activation,
        copied_from: None,
    })?)
}

fn required(name: &str, value: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", name)));
    }
    Ok(value.to_string())
}
