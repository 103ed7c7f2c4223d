//! Per-product async locks
//!
//! History updates are read-modify-upsert with no compare-and-swap, so at
//! most one ingestion pass per product id may run at a time.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct ProductLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `product_id`
    pub async fn acquire(&self, product_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks
                .entry(product_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop entries no one is holding or waiting on
    pub fn prune(&self) {
        self.locks.lock().retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
