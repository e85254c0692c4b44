//! Cross-tenant duplication of templates.
//!
//! A copy gets a fresh id, the source's content byte for byte and a
//! `copied_from` reference. It is never the default of its new tenant, even if
//! the tenant has no default yet; the target tenant picks one explicitly.

use crate::database::Database;
use crate::error::ServiceError;
use crate::services::batch::{check_target_tenant, copy_each};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::template::DocumentTemplate;
use common::requests::{BatchCopyRequest, CopyRequest};
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CopyRequest>,
) -> Result<HttpResponse, ServiceError> {
    let copy = copy_template(&state.db, &path.into_inner(), &payload.target_tenant_id)?;
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
    let report = copy_each("template", &payload.ids, &payload.target_tenant_id, |id| {
        copy_template(&state.db, id, &payload.target_tenant_id).map(|copy| copy.id)
    });
    Ok(HttpResponse::Ok().json(report))
}

pub fn copy_template(
    db: &Database,
    template_id: &str,
    target_tenant_id: &str,
) -> Result<DocumentTemplate, ServiceError> {
    check_target_tenant(db, target_tenant_id)?;
    let source = db
        .get_template(template_id)?
        .ok_or_else(|| ServiceError::not_found("template", template_id))?;
    let copy = db.insert_template_copy(&source, target_tenant_id)?;
    info!(
        "Copied template {} of tenant {} to tenant {} as {}",
        source.id, source.tenant_id, target_tenant_id, copy.id
    );
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::TemplateWrite;
    use crate::services::test_support;
    use actix_web::web::post;
    use actix_web::{test, App};
    use common::model::block::{Block, StructuredContent};
    use common::model::copy::{BatchCopyReport, CopyStatus};
    use common::model::template::TemplateType;
    use serde_json::json;

    fn store(state: &AppState, name: &str, template_type: TemplateType) -> DocumentTemplate {
        state
            .db
            .insert_template(&TemplateWrite {
                tenant_id: "t1".to_string(),
                name: name.to_string(),
                description: Some("Vorlage".to_string()),
                template_type,
                is_default: true,
                structured_content: StructuredContent {
                    blocks: vec![Block::Paragraph {
                        content: "{{member.fullName}}".to_string(),
                    }],
                    ..Default::default()
                },
            })
            .unwrap()
    }

    #[actix_web::test]
    async fn test_copy_is_verbatim_but_never_default() {
        let state = test_support::state();
        let source = store(&state, "Vertrag", TemplateType::Contract);

        let copy = copy_template(&state.db, &source.id, "t2").unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.tenant_id, "t2");
        assert!(!copy.is_default);
        assert_eq!(copy.copied_from.as_deref(), Some(source.id.as_str()));
        assert_eq!(copy.structured_content, source.structured_content);
        assert_eq!(copy.derived_markup, source.derived_markup);
        assert_eq!(copy.content_hash, source.content_hash);
        assert_eq!(copy.template_type, source.template_type);

        // The source keeps its flag.
        assert!(state.db.get_template(&source.id).unwrap().unwrap().is_default);
        assert!(state
            .db
            .list_templates("t2", None, true)
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn test_copy_errors() {
        let state = test_support::state();
        let source = store(&state, "Vertrag", TemplateType::Contract);

        assert!(matches!(
            copy_template(&state.db, &source.id, "ghost"),
            Err(ServiceError::NotFound { entity: "tenant", .. })
        ));
        assert!(matches!(
            copy_template(&state.db, "missing", "t2"),
            Err(ServiceError::NotFound { entity: "template", .. })
        ));
        assert!(matches!(
            copy_template(&state.db, &source.id, " "),
            Err(ServiceError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn test_batch_copy_reports_each_item() {
        let state = test_support::state();
        let a = store(&state, "Vertrag", TemplateType::Contract);
        let c = store(&state, "Lastschrift", TemplateType::SepaMandate);
        let db = state.db.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/copy", post().to(process_batch)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/copy")
            .set_json(json!({
                "ids": [a.id, "does-not-exist", c.id],
                "target_tenant_id": "t3",
            }))
            .to_request();
        let report: BatchCopyReport = test::call_and_read_body_json(&app, req).await;

        assert_eq!(report.target_tenant_id, "t3");
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.results[0].source_id, a.id);
        assert_eq!(report.results[1].source_id, "does-not-exist");
        assert!(matches!(
            &report.results[1].status,
            CopyStatus::Failed { kind, .. } if kind == "not_found"
        ));
        assert_eq!(report.results[2].source_id, c.id);

        let copied = db.list_templates("t3", None, false).unwrap();
        assert_eq!(copied.len(), 2);
        assert!(copied.iter().all(|t| !t.is_default));
    }

    #[actix_web::test]
    async fn test_single_copy_route() {
        let state = test_support::state();
        let source = store(&state, "Vertrag", TemplateType::Contract);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/{template_id}/copy", post().to(process)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/{}/copy", source.id))
            .set_json(json!({ "target_tenant_id": "t2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let copy: DocumentTemplate = test::read_body_json(resp).await;
        assert_eq!(copy.copied_from, Some(source.id));
    }
}
