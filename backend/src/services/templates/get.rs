use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let template_id = path.into_inner();
    let template = state
        .db
        .get_template(&template_id)?
        .ok_or_else(|| ServiceError::not_found("template", template_id))?;
    Ok(HttpResponse::Ok().json(template))
}
