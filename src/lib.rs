// src/lib.rs

use axum::{routing::{get, post}, Router};
use services::asn_ingestion::TurnoverService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub turnover: Arc<TurnoverService>,
}

pub mod entities {
    pub mod prelude;
    pub mod tags;
    pub mod turnover_history;
}

pub mod services {
    pub mod asn_ingestion;
    pub mod confidence;
    pub mod history_aggregator;
    pub mod in_memory_store;
    pub mod presence_snapshot;
    pub mod product_locks;
    pub mod turn_record;
    pub mod turnover_store;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

/// Build the HTTP router over `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/asn", post(handlers::asn::ingest_asn))
        .route(
            "/api/turnover/{product_id}",
            get(handlers::turnover::get_turnover_history),
        )
        .route(
            "/api/confidence",
            post(handlers::confidence::estimate_confidence),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "Turnover backend is running"
}
