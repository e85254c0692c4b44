//! Shared application state handed to every request handler.

use crate::config::Config;
use crate::database::Database;
use crate::engine::renderer::Renderer;
use crate::engine::resolver::MissingValuePolicy;
use crate::providers::SampleDataProvider;
use std::sync::Arc;
use std::time::Duration;

/// Cloned into each actix worker; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Template and legal document stores.
    pub db: Arc<Database>,
    /// Source of tenant, member and contract records for previews.
    pub provider: Arc<dyn SampleDataProvider>,
    pub renderer: Renderer,
    /// Upper bound on sample-data lookups. Past it, previews use synthetic records.
    pub preview_timeout: Duration,
}

impl AppState {
    pub fn new(db: Arc<Database>, provider: Arc<dyn SampleDataProvider>, config: &Config) -> Self {
        let policy = if config.mark_missing_placeholders {
            MissingValuePolicy::Marked
        } else {
            MissingValuePolicy::Empty
        };
        Self {
            db,
            provider,
            renderer: Renderer::new(policy),
            preview_timeout: config.preview_timeout,
        }
    }
}
