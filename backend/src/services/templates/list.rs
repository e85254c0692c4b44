use crate::database::Database;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::template::TemplateSummary;
use common::requests::ListTemplatesQuery;

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListTemplatesQuery>,
) -> Result<HttpResponse, ServiceError> {
    let summaries = list_templates(&state.db, &query)?;
    Ok(HttpResponse::Ok().json(summaries))
}

pub fn list_templates(
    db: &Database,
    query: &ListTemplatesQuery,
) -> Result<Vec<TemplateSummary>, ServiceError> {
    if query.tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation("tenant_id is required".to_string()));
    }
    Ok(db.list_templates(&query.tenant_id, query.template_type, query.default_only)?)
}
