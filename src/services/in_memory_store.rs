//! In-memory turnover store
//!
//! Implements both store traits over `parking_lot` maps. Used by tests and
//! for running the service without a database.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StoreError;
use crate::models::turnover::{History, PresenceCounts};
use crate::services::presence_snapshot::{count_presence, TagState};
use crate::services::turnover_store::{PresenceSnapshot, TurnoverStore};

#[derive(Default)]
pub struct InMemoryTurnoverStore {
    histories: RwLock<HashMap<String, History>>,
    /// Tag states keyed by EPC
    tags: RwLock<HashMap<String, TagState>>,
    /// Products whose reads and writes fail, for exercising error paths
    unavailable: RwLock<HashSet<String>>,
    upserts: AtomicUsize,
}

impl InMemoryTurnoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag's state
    pub fn put_tag(&self, tag: TagState) {
        self.tags.write().insert(tag.epc.clone(), tag);
    }

    /// Number of successful upserts so far
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Make every store operation for `product_id` fail
    pub fn set_unavailable(&self, product_id: &str, unavailable: bool) {
        let mut set = self.unavailable.write();
        if unavailable {
            set.insert(product_id.to_string());
        } else {
            set.remove(product_id);
        }
    }

    fn check_available(&self, product_id: &str, operation: &'static str) -> Result<(), StoreError> {
        if self.unavailable.read().contains(product_id) {
            return Err(StoreError::database(
                product_id,
                operation,
                sea_orm::DbErr::Custom("store unavailable".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TurnoverStore for InMemoryTurnoverStore {
    async fn get(&self, product_id: &str) -> Result<Option<History>, StoreError> {
        self.check_available(product_id, "history read")?;
        Ok(self.histories.read().get(product_id).cloned())
    }

    async fn upsert(&self, history: &History) -> Result<(), StoreError> {
        self.check_available(&history.product_id, "history upsert")?;
        self.histories
            .write()
            .insert(history.product_id.clone(), history.clone());
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl PresenceSnapshot for InMemoryTurnoverStore {
    async fn query(&self, product_id: &str, since_ms: i64) -> Result<PresenceCounts, StoreError> {
        self.check_available(product_id, "presence snapshot")?;
        let tags = self.tags.read();
        Ok(count_presence(
            tags.values().filter(|t| t.product_id == product_id),
            since_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(epc: &str, product_id: &str, event: &str, last_read: i64) -> TagState {
        TagState {
            epc: epc.to_string(),
            product_id: product_id.to_string(),
            event: event.to_string(),
            last_read,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_history() {
        let store = InMemoryTurnoverStore::new();
        let mut history = History::bootstrap("sku-1", 10);
        store.upsert(&history).await.unwrap();

        history.daily_turn = 0.4;
        history.timestamp = 20;
        store.upsert(&history).await.unwrap();

        assert_eq!(store.get("sku-1").await.unwrap(), Some(history));
        assert_eq!(store.upsert_count(), 2);
        assert_eq!(store.get("sku-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshot_scoped_to_product() {
        let store = InMemoryTurnoverStore::new();
        store.put_tag(tag("a", "sku-1", "arrival", 5));
        store.put_tag(tag("b", "sku-1", "departed", 50));
        store.put_tag(tag("c", "sku-2", "arrival", 5));

        let counts = store.query("sku-1", 10).await.unwrap();
        assert_eq!(counts.present_count, 1);
        assert_eq!(counts.departed_count, 1);
    }

    #[tokio::test]
    async fn test_unavailable_product_fails() {
        let store = InMemoryTurnoverStore::new();
        store.set_unavailable("sku-1", true);

        assert!(store.get("sku-1").await.is_err());
        assert!(store.upsert(&History::bootstrap("sku-1", 0)).await.is_err());
        assert!(store.get("sku-2").await.is_ok());

        store.set_unavailable("sku-1", false);
        assert!(store.get("sku-1").await.is_ok());
    }
}
