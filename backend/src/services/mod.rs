mod batch;
pub mod legal_documents;
pub mod placeholders;
pub mod templates;

use actix_web::web;

/// Registers every API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(placeholders::configure_routes())
        .service(templates::configure_routes())
        .service(legal_documents::configure_routes());
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::database::Database;
    use crate::providers::DatabaseSampleProvider;
    use crate::state::AppState;
    use common::model::context::TenantRecord;
    use std::sync::Arc;

    /// In-memory state with tenants `t1`, `t2` and `t3` registered.
    pub fn state() -> AppState {
        let db = Arc::new(Database::open_in_memory().unwrap());
        for (id, name) in [("t1", "Dojo Nord"), ("t2", "Dojo Süd"), ("t3", "Dojo West")] {
            db.insert_tenant(&TenantRecord {
                id: id.to_string(),
                name: name.to_string(),
                ..Default::default()
            })
            .unwrap();
        }
        let provider = Arc::new(DatabaseSampleProvider::new(db.clone()));
        AppState::new(db, provider, &Config::default())
    }
}
