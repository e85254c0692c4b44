use crate::database::Database;
use crate::engine::versions::sort_history;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::legal::{LegalDocumentType, LegalDocumentVersion};
use common::requests::LegalDocumentQuery;

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<LegalDocumentQuery>,
) -> Result<HttpResponse, ServiceError> {
    let history = list_history(&state.db, &query.tenant_id, query.document_type)?;
    Ok(HttpResponse::Ok().json(history))
}

/// Every version of the pair, highest version label first.
pub fn list_history(
    db: &Database,
    tenant_id: &str,
    document_type: LegalDocumentType,
) -> Result<Vec<LegalDocumentVersion>, ServiceError> {
    if tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation("tenant_id is required".to_string()));
    }
    let mut versions = db.list_legal_document_versions(tenant_id, document_type)?;
    sort_history(&mut versions);
    Ok(versions)
}
