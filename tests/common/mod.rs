use std::sync::Arc;

use axum::Router;
use turnover_backend::config::TurnoverConfig;
use turnover_backend::services::asn_ingestion::TurnoverService;
use turnover_backend::services::in_memory_store::InMemoryTurnoverStore;
use turnover_backend::services::presence_snapshot::TagState;
use turnover_backend::{app, AppState};

pub const DAY: i64 = 86_400_000;
pub const HOUR: i64 = 3_600_000;

/// Set up an app backed by an in-memory store
/// Returns the store as well so tests can seed tags and inspect writes
pub fn setup_test_app(config: TurnoverConfig) -> (Arc<InMemoryTurnoverStore>, Arc<TurnoverService>, Router) {
    let store = Arc::new(InMemoryTurnoverStore::new());
    let turnover = Arc::new(TurnoverService::new(store.clone(), store.clone(), config));
    let router = app(AppState {
        turnover: turnover.clone(),
    });

    (store, turnover, router)
}

/// Seed `present` in-store tags and `departed` departed tags, all read at `read_at`
#[allow(dead_code)]
pub fn seed_tags(store: &InMemoryTurnoverStore, product_id: &str, present: usize, departed: usize, read_at: i64) {
    for i in 0..present {
        store.put_tag(TagState {
            epc: format!("{}-present-{}", product_id, i),
            product_id: product_id.to_string(),
            event: "arrival".to_string(),
            last_read: read_at,
        });
    }

    for i in 0..departed {
        store.put_tag(TagState {
            epc: format!("{}-departed-{}", product_id, i),
            product_id: product_id.to_string(),
            event: "departed".to_string(),
            last_read: read_at,
        });
    }
}
