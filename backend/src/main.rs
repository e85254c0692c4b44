mod config;
mod database;
mod engine;
mod error;
mod providers;
mod services;
mod state;

use crate::config::Config;
use crate::database::Database;
use crate::providers::DatabaseSampleProvider;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let db = match Database::open(&config.database_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Cannot open database {}: {}", config.database_path, e);
            return Err(io::Error::other(e));
        }
    };
    info!("Using database {}", config.database_path);

    let provider = Arc::new(DatabaseSampleProvider::new(db.clone()));
    let state = AppState::new(db, provider, &config);
    let json_limit = config.json_limit_bytes;

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
