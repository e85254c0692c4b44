//! # Template Service Module
//!
//! This module aggregates all API endpoints related to document templates.
//! It routes requests under `/api/templates` to the handler logic in its
//! sub-modules.
//!
//! ## Sub-modules:
//! - `list`: Lists a tenant's templates, optionally by type or defaults only.
//! - `save`: Creates a template or replaces one as a whole, regenerating its derived markup.
//! - `get`: Retrieves a single template.
//! - `delete`: Deletes a template.
//! - `set_default`: Makes a template the default of its tenant and type.
//! - `preview`: Renders a saved template with sample data, or unsaved content as written.
//! - `copy`: Duplicates templates into another tenant, one at a time or in batches.

mod copy;
mod delete;
mod get;
mod list;
mod preview;
mod save;
mod set_default;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /?tenant_id=&template_type=&default_only=`**: template summaries of a tenant.
/// *   **`POST /save`**: create (no `id`) or whole-document update (with `id`).
/// *   **`POST /preview`**: preview of a saved template or of unsaved content.
/// *   **`POST /copy`**: batch copy into a target tenant, with a per-item report.
/// *   **`GET /{template_id}`**, **`DELETE /{template_id}`**
/// *   **`POST /{template_id}/default`**: default swap.
/// *   **`GET /{template_id}/preview?tenant_id=`**: preview of a saved template.
/// *   **`POST /{template_id}/copy`**: single copy into a target tenant.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/preview", post().to(preview::process))
        .route("/copy", post().to(copy::process_batch))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/default", post().to(set_default::process))
        .route("/{template_id}/preview", get().to(preview::process_saved))
        .route("/{template_id}/copy", post().to(copy::process))
}
