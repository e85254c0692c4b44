//! # Legal Document Service Module
//!
//! Routes requests under `/api/legal_documents`. Legal documents (terms,
//! privacy policy, house rules, ...) are kept as immutable versions per tenant
//! and document type. Exactly one version of a pair may be active; templates
//! transclude the active one.
//!
//! ## Sub-modules:
//! - `list`: Version history of a pair, newest label first.
//! - `active`: The active version of a pair.
//! - `publish`: Stores a new version.
//! - `get`: Retrieves a single version.
//! - `activate`: Moves the active flag to a version.
//! - `copy`: Duplicates versions into another tenant.

mod activate;
mod active;
mod copy;
mod get;
mod list;
mod publish;

pub use active::select_active;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/legal_documents";

/// Configures and returns the Actix `Scope` for all legal document routes.
///
/// # Registered Routes:
///
/// *   **`GET /?tenant_id=&document_type=`**: history.
/// *   **`GET /active?tenant_id=&document_type=`**: the active version.
/// *   **`POST /publish`**: new version.
/// *   **`POST /copy`**: batch copy into a target tenant.
/// *   **`GET /{version_id}`**
/// *   **`POST /{version_id}/activate`**: active swap.
/// *   **`POST /{version_id}/copy`**: single copy into a target tenant.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/active", get().to(active::process))
        .route("/publish", post().to(publish::process))
        .route("/copy", post().to(copy::process_batch))
        .route("/{version_id}", get().to(get::process))
        .route("/{version_id}/activate", post().to(activate::process))
        .route("/{version_id}/copy", post().to(copy::process))
}
