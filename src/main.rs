mod api_docs;
mod config;
mod controllers;
mod error;
mod geo;
mod models;
mod providers;
mod routes;
mod services;
mod shared_state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, response::Html, routing::get};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::solar_routes::solar_routes;
use crate::shared_state::AppState;

#[tokio::main]
async fn main() {
    env_logger::init();

    // 1. Load configuration; a missing file means the built-in defaults
    //    (degraded external lookups without an API key, but a working server).
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to load config.json ({e}), falling back to defaults");
            Config::default()
        }
    };
    if config.google.api_key.is_empty() {
        log::warn!("No Google API key configured; elevation and solar lookups will degrade");
    }

    // 2. One HTTP client shared by all providers, bounded by the fetch timeout.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.solar.fetch_timeout_secs))
        .build()
        .expect("failed to build http client");

    // 3. Immutable engine state behind the handlers.
    let state = AppState::new(&config, http);

    // 4. Axum HTTP server with permissive CORS for the map frontend.
    let app = Router::new()
        .nest("/api", solar_routes(state))
        .route("/scalar", get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    log::info!("API server listening on http://{addr}");
    log::info!("Scalar UI: http://{addr}/scalar");

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
