//! Procurement API Library
//!
//! Backend service for procurement purchase requests: multi-line requests for
//! goods that move through an approval workflow.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod queries;
pub mod request_number;
pub mod services;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi as _;
    Json(openapi::ApiDoc::openapi())
}

/// Builds the full application router with all routes and middleware layers.
pub fn app_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .merge(handlers::health::health_routes())
        .nest(
            "/api/v1/purchase-requests",
            handlers::purchase_requests::purchase_request_routes(),
        )
        .nest("/api/v1/products", handlers::products::product_routes())
        .nest("/api/v1/units", handlers::units::unit_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
