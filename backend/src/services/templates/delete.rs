use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let template_id = path.into_inner();
    if !state.db.delete_template(&template_id)? {
        return Err(ServiceError::not_found("template", template_id));
    }
    info!("Deleted template {}", template_id);
    Ok(HttpResponse::NoContent().finish())
}
