use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Makes the version the active one of its pair, deactivating the previous
/// active version in the same transaction.
pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let version_id = path.into_inner();
    let version = state
        .db
        .activate_legal_document_version(&version_id)?
        .ok_or_else(|| ServiceError::not_found("legal document", version_id))?;
    Ok(HttpResponse::Ok().json(version))
}
