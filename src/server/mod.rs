//! HTTP surface for the speed-ranking engine.
//!
//! Thin actix-web handlers over the engine. Authentication and role checks
//! happen upstream; the proxy forwards the caller's team in the
//! `X-Team-Id` header.

pub mod handlers;


use actix_web::{middleware, web, App, HttpServer};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::speed::SpeedModel;
use crate::storage::RegattaDatabase;

/// Application state shared across handlers.
pub struct AppState {
    /// rusqlite connections are not Sync; requests serialize on the lock.
    pub db: Mutex<RegattaDatabase>,
    pub model: Arc<dyn SpeedModel>,
}

/// Configure the route table on an actix `App` or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/boat-classes", web::get().to(handlers::boat_classes))
        .route("/rankings/{boat_class}", web::get().to(handlers::rankings))
        .route("/head-to-head", web::get().to(handlers::head_to_head))
        .route("/calculate/{boat_class}", web::post().to(handlers::calculate))
        .route("/analyze-race/{race_id}", web::get().to(handlers::analyze_race));
}

/// Run the HTTP server until shutdown.
pub async fn run(
    host: &str,
    port: u16,
    db_path: Option<&Path>,
    model: Arc<dyn SpeedModel>,
) -> std::io::Result<()> {
    let db = match db_path {
        Some(path) => RegattaDatabase::open(path),
        None => RegattaDatabase::new(),
    }
    .map_err(std::io::Error::other)?;

    let state = Arc::new(AppState {
        db: Mutex::new(db),
        model,
    });

    let addr = format!("{host}:{port}");
    info!("Starting speed engine at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&addr)?
    .run()
    .await
}
