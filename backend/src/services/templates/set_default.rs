//! `POST /api/templates/{id}/default` makes a template the default of its
//! tenant and type. The previous default is cleared in the same transaction,
//! so readers never see two defaults or none in between.

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
        .set_default_template(&template_id)?
        .ok_or_else(|| ServiceError::not_found("template", template_id))?;
    Ok(HttpResponse::Ok().json(template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::TemplateWrite;
    use crate::services::test_support;
    use actix_web::web::post;
    use actix_web::{test, App};
    use common::model::block::StructuredContent;
    use common::model::template::{DocumentTemplate, TemplateType};

    fn write(name: &str, is_default: bool) -> TemplateWrite {
        TemplateWrite {
            tenant_id: "t1".to_string(),
            name: name.to_string(),
            description: None,
            template_type: TemplateType::SepaMandate,
            is_default,
            structured_content: StructuredContent::default(),
        }
    }

    #[actix_web::test]
    async fn test_default_moves_to_new_template() {
        let state = test_support::state();
        let first = state.db.insert_template(&write("Alt", true)).unwrap();
        let second = state.db.insert_template(&write("Neu", false)).unwrap();
        let db = state.db.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/{template_id}/default", post().to(process)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/{}/default", second.id))
            .to_request();
        let updated: DocumentTemplate = test::call_and_read_body_json(&app, req).await;
        assert!(updated.is_default);
        assert!(!db.get_template(&first.id).unwrap().unwrap().is_default);

        let defaults = db
            .list_templates("t1", Some(TemplateType::SepaMandate), true)
            .unwrap();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, second.id);

        let req = test::TestRequest::post().uri("/nope/default").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }
}
