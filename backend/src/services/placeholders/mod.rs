//! # Placeholder Catalog Service
//!
//! Serves the static placeholder catalog under `GET /api/placeholders`, so the
//! editor can offer exactly the tokens the resolver understands.

use actix_web::web::{get, scope};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::placeholder::catalog;

const API_PATH: &str = "/api/placeholders";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process() -> impl Responder {
    HttpResponse::Ok().json(catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use common::model::placeholder::PlaceholderDefinition;

    #[actix_web::test]
    async fn test_catalog_endpoint() {
        let app = test::init_service(App::new().service(configure_routes())).await;
        let req = test::TestRequest::get().uri("/api/placeholders").to_request();
        let entries: Vec<PlaceholderDefinition> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(entries, catalog());
    }
}
