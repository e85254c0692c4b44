//! # Template Save Service
//!
//! `POST /api/templates/save` creates a template (payload without `id`) or
//! replaces an existing one as a whole (payload with `id`). There is no partial
//! update: every save carries the complete block tree, and the store flattens
//! it into the derived markup and stylesheet in the same transaction.
//!
//! The response carries the stored template plus `unknown_placeholders`, the
//! tokens the content uses that the placeholder catalog does not define. They
//! are hints for the author, not errors; at render time they fall back to empty.

use crate::database::{Database, TemplateWrite};
use crate::engine::renderer::unknown_placeholders;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::template::SavedTemplate;
use common::requests::SaveTemplateRequest;
use log::warn;

pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<SaveTemplateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let is_create = payload.id.is_none();
    let saved = save_template(&state.db, payload.into_inner())?;
    if is_create {
        Ok(HttpResponse::Created().json(saved))
    } else {
        Ok(HttpResponse::Ok().json(saved))
    }
}

pub fn save_template(
    db: &Database,
    payload: SaveTemplateRequest,
) -> Result<SavedTemplate, ServiceError> {
    validate(&payload)?;

    let write = TemplateWrite {
        tenant_id: payload.tenant_id.trim().to_string(),
        name: payload.name.trim().to_string(),
        description: payload
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        template_type: payload.template_type,
        is_default: payload.is_default,
        structured_content: payload.structured_content,
    };

    let template = match payload.id {
        None => {
            if !db.tenant_exists(&write.tenant_id)? {
                return Err(ServiceError::not_found("tenant", write.tenant_id));
            }
            db.insert_template(&write)?
        }
        Some(id) => {
            // Ownership never changes, so an id owned by another tenant is not found.
            match db.get_template(&id)? {
                Some(existing) if existing.tenant_id == write.tenant_id => {}
                _ => return Err(ServiceError::not_found("template", id)),
            }
            db.update_template(&id, &write)?
                .ok_or_else(|| ServiceError::not_found("template", id.clone()))?
        }
    };

    let unknown_placeholders = unknown_placeholders(&template);
    if !unknown_placeholders.is_empty() {
        warn!(
            "Template {} uses unknown placeholders: {}",
            template.id,
            unknown_placeholders.join(", ")
        );
    }

    Ok(SavedTemplate {
        template,
        unknown_placeholders,
    })
}

fn validate(payload: &SaveTemplateRequest) -> Result<(), ServiceError> {
    if payload.tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation("tenant_id is required".to_string()));
    }
    if payload.name.trim().is_empty() {
        return Err(ServiceError::Validation("name is required".to_string()));
    }
    if matches!(&payload.id, Some(id) if id.trim().is_empty()) {
        return Err(ServiceError::Validation("id must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use common::model::block::{Block, StructuredContent};
    use common::model::template::TemplateType;

    fn request(id: Option<String>, name: &str, is_default: bool) -> SaveTemplateRequest {
        SaveTemplateRequest {
            id,
            tenant_id: "t1".to_string(),
            name: name.to_string(),
            description: Some("  ".to_string()),
            template_type: TemplateType::Contract,
            is_default,
            structured_content: StructuredContent {
                blocks: vec![Block::Paragraph {
                    content: "{{member.firstName}} {{member.nickname}} {{gym.name}}".to_string(),
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_create_reports_unknown_placeholders() {
        let state = test_support::state();
        let saved = save_template(&state.db, request(None, " Vertrag ", false)).unwrap();
        assert_eq!(saved.template.name, "Vertrag");
        assert_eq!(saved.template.description, None);
        assert_eq!(
            saved.unknown_placeholders,
            vec!["member.nickname".to_string(), "gym.name".to_string()]
        );
    }

    #[test]
    fn test_validation_errors_persist_nothing() {
        let state = test_support::state();
        let err = save_template(&state.db, request(None, "   ", false)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let mut no_tenant = request(None, "Vertrag", false);
        no_tenant.tenant_id = String::new();
        assert!(matches!(
            save_template(&state.db, no_tenant).unwrap_err(),
            ServiceError::Validation(_)
        ));
        assert!(state.db.list_templates("t1", None, false).unwrap().is_empty());
    }

    #[test]
    fn test_create_for_unknown_tenant_is_not_found() {
        let state = test_support::state();
        let mut req = request(None, "Vertrag", false);
        req.tenant_id = "ghost".to_string();
        let err = save_template(&state.db, req).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "tenant", .. }));
    }

    #[test]
    fn test_update_checks_ownership() {
        let state = test_support::state();
        let created = save_template(&state.db, request(None, "Vertrag", false))
            .unwrap()
            .template;

        let mut foreign = request(Some(created.id.clone()), "Fremd", false);
        foreign.tenant_id = "t2".to_string();
        let err = save_template(&state.db, foreign).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "template", .. }));

        let updated = save_template(&state.db, request(Some(created.id.clone()), "Neu", true))
            .unwrap()
            .template;
        assert_eq!(updated.version, 2);
        assert!(updated.is_default);

        let missing = save_template(&state.db, request(Some("nope".to_string()), "X", false));
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }
}
