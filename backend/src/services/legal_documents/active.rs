use crate::database::Database;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::legal::{LegalDocumentType, LegalDocumentVersion};
use common::requests::LegalDocumentQuery;

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<LegalDocumentQuery>,
) -> Result<HttpResponse, ServiceError> {
    let version = select_active(&state.db, &query.tenant_id, query.document_type)?;
    Ok(HttpResponse::Ok().json(version))
}

/// The active version of a tenant's document type. Validity dates are not
/// consulted; `NotFound` means the tenant has not configured the type.
pub fn select_active(
    db: &Database,
    tenant_id: &str,
    document_type: LegalDocumentType,
) -> Result<LegalDocumentVersion, ServiceError> {
    db.active_legal_document(tenant_id, document_type)?
        .ok_or_else(|| {
            ServiceError::not_found(
                "active legal document",
                format!("{}/{}", tenant_id, document_type),
            )
        })
}
