//! ASN ingestion pipeline
//!
//! Every shipment-notice item referencing a product id advances that
//! product's turnover history:
//! - no history yet: bootstrap an empty history anchored at `now`
//! - history exists: count present/departed tags since the last
//!   computation, derive a turn record, fold it into the history, persist
//!
//! Windows that are too short or have no inventory are skipped without
//! touching the store. Store failures are scoped to the item that hit them.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::TurnoverConfig;
use crate::error::{StoreError, TurnError};
use crate::models::asn::{AdvanceShippingNotice, AsnSummary};
use crate::models::turnover::History;
use crate::services::confidence;
use crate::services::product_locks::ProductLocks;
use crate::services::turn_record::build_turn_record;
use crate::services::turnover_store::{PresenceSnapshot, TurnoverStore};

/// What a single recompute did to a product's history
#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    /// History created with no records
    Bootstrapped,
    /// A record was added and the history persisted
    Recorded { daily_turn: f64, record_count: usize },
    /// Not enough signal yet; nothing persisted
    Skipped(TurnError),
}

pub struct TurnoverService {
    store: Arc<dyn TurnoverStore>,
    snapshot: Arc<dyn PresenceSnapshot>,
    config: TurnoverConfig,
    locks: ProductLocks,
}

impl TurnoverService {
    pub fn new(
        store: Arc<dyn TurnoverStore>,
        snapshot: Arc<dyn PresenceSnapshot>,
        config: TurnoverConfig,
    ) -> Self {
        Self {
            store,
            snapshot,
            config,
            locks: ProductLocks::new(),
        }
    }

    pub fn config(&self) -> &TurnoverConfig {
        &self.config
    }

    pub async fn history(&self, product_id: &str) -> Result<Option<History>, StoreError> {
        self.store.get(product_id).await
    }

    /// Confidence that a tag last read at `last_read_ms` is still present
    pub fn estimate_confidence(&self, last_read_ms: i64, is_contra_reading: bool) -> f64 {
        confidence::estimate_confidence(&self.config.confidence, last_read_ms, is_contra_reading)
    }

    pub async fn recompute_history_for_asn(
        &self,
        product_id: &str,
    ) -> Result<RecomputeOutcome, StoreError> {
        self.recompute_history_for_asn_at(product_id, Utc::now().timestamp_millis())
            .await
    }

    /// Advance `product_id`'s history as of `now_ms`.
    ///
    /// Holds the product's lock across read, compute and upsert.
    pub async fn recompute_history_for_asn_at(
        &self,
        product_id: &str,
        now_ms: i64,
    ) -> Result<RecomputeOutcome, StoreError> {
        let outcome = {
            let _guard = self.locks.acquire(product_id).await;
            self.recompute_locked(product_id, now_ms).await
        };

        self.locks.prune();
        outcome
    }

    async fn recompute_locked(
        &self,
        product_id: &str,
        now_ms: i64,
    ) -> Result<RecomputeOutcome, StoreError> {
        let Some(mut history) = self.store.get(product_id).await? else {
            let history = History::bootstrap(product_id, now_ms);
            self.store.upsert(&history).await?;

            info!(product_id = %product_id, timestamp = now_ms, "Bootstrapped turnover history");
            return Ok(RecomputeOutcome::Bootstrapped);
        };

        let counts = self.snapshot.query(product_id, history.timestamp).await?;

        let record = match build_turn_record(counts, now_ms, history.timestamp) {
            Ok(record) => record,
            Err(reason) => {
                debug!(
                    product_id = %product_id,
                    present = counts.present_count,
                    departed = counts.departed_count,
                    reason = %reason,
                    "Skipping turn record"
                );
                return Ok(RecomputeOutcome::Skipped(reason));
            }
        };

        let sample = record.daily_turn;
        history.apply_record(record, &self.config);
        self.store.upsert(&history).await?;

        info!(
            product_id = %product_id,
            sample = sample,
            daily_turn = history.daily_turn,
            records = history.records.len(),
            "Recorded turn sample"
        );

        Ok(RecomputeOutcome::Recorded {
            daily_turn: history.daily_turn,
            record_count: history.records.len(),
        })
    }

    pub async fn process_asn(&self, asn: &AdvanceShippingNotice) -> AsnSummary {
        self.process_asn_at(asn, Utc::now().timestamp_millis()).await
    }

    /// Process items sequentially in input order; a failing item never
    /// aborts the rest of the batch.
    pub async fn process_asn_at(&self, asn: &AdvanceShippingNotice, now_ms: i64) -> AsnSummary {
        let asn_id = asn.asn_id.as_deref().unwrap_or("-");
        info!(asn_id = %asn_id, items = asn.items.len(), "Processing ASN");

        let mut summary = AsnSummary::default();

        for item in &asn.items {
            summary.processed += 1;

            match self.recompute_history_for_asn_at(&item.product_id, now_ms).await {
                Ok(RecomputeOutcome::Bootstrapped) => summary.bootstrapped += 1,
                Ok(RecomputeOutcome::Recorded { .. }) => summary.recorded += 1,
                Ok(RecomputeOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        asn_id = %asn_id,
                        product_id = %item.product_id,
                        error = %e,
                        "Failed to recompute turnover history"
                    );
                }
            }
        }

        info!(
            asn_id = %asn_id,
            processed = summary.processed,
            bootstrapped = summary.bootstrapped,
            recorded = summary.recorded,
            skipped = summary.skipped,
            failed = summary.failed,
            "ASN processing complete"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asn::AsnItem;
    use crate::services::in_memory_store::InMemoryTurnoverStore;
    use crate::services::presence_snapshot::TagState;

    const DAY: i64 = 86_400_000;
    const HOUR: i64 = 3_600_000;
    const T0: i64 = 1_700_000_000_000;

    fn config(minimum_data_points: usize, history_maximum: usize) -> TurnoverConfig {
        TurnoverConfig {
            minimum_data_points,
            history_maximum,
            ..Default::default()
        }
    }

    fn service(config: TurnoverConfig) -> (Arc<InMemoryTurnoverStore>, TurnoverService) {
        let store = Arc::new(InMemoryTurnoverStore::new());
        let service = TurnoverService::new(store.clone(), store.clone(), config);
        (store, service)
    }

    fn seed_tags(store: &InMemoryTurnoverStore, product_id: &str, present: usize, departed: usize, read_at: i64) {
        for i in 0..present {
            store.put_tag(TagState {
                epc: format!("{}-p{}", product_id, i),
                product_id: product_id.to_string(),
                event: "arrival".to_string(),
                last_read: read_at,
            });
        }
        for i in 0..departed {
            store.put_tag(TagState {
                epc: format!("{}-d{}", product_id, i),
                product_id: product_id.to_string(),
                event: "departed".to_string(),
                last_read: read_at,
            });
        }
    }

    fn asn(product_ids: &[&str]) -> AdvanceShippingNotice {
        AdvanceShippingNotice {
            asn_id: Some("asn-1".to_string()),
            event_time: None,
            items: product_ids
                .iter()
                .map(|id| AsnItem {
                    product_id: id.to_string(),
                    item_id: None,
                    item_epcs: Vec::new(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_first_asn_bootstraps() {
        let (store, service) = service(config(1, 10));

        let outcome = service.recompute_history_for_asn_at("sku-1", T0).await.unwrap();
        assert_eq!(outcome, RecomputeOutcome::Bootstrapped);

        let history = store.get("sku-1").await.unwrap().unwrap();
        assert_eq!(history, History::bootstrap("sku-1", T0));
    }

    #[tokio::test]
    async fn test_bootstrap_then_short_then_full_day() {
        let (store, service) = service(config(1, 10));
        seed_tags(&store, "sku-1", 300, 100, T0 + HOUR);

        service.recompute_history_for_asn_at("sku-1", T0).await.unwrap();
        assert_eq!(store.upsert_count(), 1);

        let outcome = service
            .recompute_history_for_asn_at("sku-1", T0 + 12 * HOUR)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RecomputeOutcome::Skipped(TurnError::TimeTooShort { .. })
        ));
        assert_eq!(store.upsert_count(), 1);
        assert!(store.get("sku-1").await.unwrap().unwrap().records.is_empty());

        let outcome = service
            .recompute_history_for_asn_at("sku-1", T0 + DAY)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            RecomputeOutcome::Recorded {
                daily_turn: 0.25,
                record_count: 1
            }
        );

        let history = store.get("sku-1").await.unwrap().unwrap();
        assert_eq!(history.records.len(), 1);
        assert_eq!(history.records[0].previous_timestamp, T0);
        assert_eq!(history.records[0].timestamp, T0 + DAY);
        assert_eq!(history.timestamp, T0 + DAY);
        assert_eq!(history.daily_turn, 0.25);
    }

    #[tokio::test]
    async fn test_single_record_below_minimum_keeps_zero() {
        let (store, service) = service(config(2, 10));
        seed_tags(&store, "sku-1", 100, 100, T0 + HOUR);

        service.recompute_history_for_asn_at("sku-1", T0).await.unwrap();
        let outcome = service
            .recompute_history_for_asn_at("sku-1", T0 + DAY)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RecomputeOutcome::Recorded {
                daily_turn: 0.0,
                record_count: 1
            }
        );
        assert_eq!(store.get("sku-1").await.unwrap().unwrap().records[0].daily_turn, 0.5);
    }

    #[tokio::test]
    async fn test_no_inventory_skips_without_persisting() {
        let (store, service) = service(config(1, 10));

        service.recompute_history_for_asn_at("sku-1", T0).await.unwrap();
        let outcome = service
            .recompute_history_for_asn_at("sku-1", T0 + 3 * DAY)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::Skipped(TurnError::NoInventory));
        assert_eq!(store.upsert_count(), 1);
        assert_eq!(store.get("sku-1").await.unwrap().unwrap().timestamp, T0);
    }

    #[tokio::test]
    async fn test_history_truncated_to_maximum() {
        let (store, service) = service(config(1, 3));
        seed_tags(&store, "sku-1", 10, 0, T0);

        service.recompute_history_for_asn_at("sku-1", T0).await.unwrap();
        for day in 1..=5 {
            service
                .recompute_history_for_asn_at("sku-1", T0 + day * DAY)
                .await
                .unwrap();
        }

        let history = store.get("sku-1").await.unwrap().unwrap();
        let timestamps: Vec<i64> = history.records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![T0 + 5 * DAY, T0 + 4 * DAY, T0 + 3 * DAY]);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_for_single_product() {
        let (store, service) = service(config(1, 10));
        store.set_unavailable("sku-1", true);

        let err = service.recompute_history_for_asn_at("sku-1", T0).await.unwrap_err();
        assert_eq!(err.product_id(), "sku-1");
    }

    #[tokio::test]
    async fn test_direct_recompute_releases_lock_entries() {
        let (store, service) = service(config(1, 10));
        store.set_unavailable("sku-bad", true);

        for product_id in ["sku-1", "sku-2", "sku-3"] {
            service.recompute_history_for_asn_at(product_id, T0).await.unwrap();
        }
        assert!(service.recompute_history_for_asn_at("sku-bad", T0).await.is_err());

        assert!(service.locks.is_empty());
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let (store, service) = service(config(1, 10));
        store.set_unavailable("sku-bad", true);

        let summary = service
            .process_asn_at(&asn(&["sku-1", "sku-bad", "sku-2", "sku-1"]), T0)
            .await;

        assert_eq!(
            summary,
            AsnSummary {
                processed: 4,
                bootstrapped: 2,
                recorded: 0,
                skipped: 1,
                failed: 1,
            }
        );
        assert!(store.get("sku-2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_recomputes_do_not_lose_samples() {
        let (store, service) = service(config(1, 10));
        let service = Arc::new(service);
        seed_tags(&store, "sku-1", 100, 100, T0);

        service.recompute_history_for_asn_at("sku-1", T0 - 2 * DAY).await.unwrap();

        // Under the product lock the second pass starts from the first's timestamp
        let a = tokio::spawn({
            let service = service.clone();
            async move { service.recompute_history_for_asn_at("sku-1", T0).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            async move { service.recompute_history_for_asn_at("sku-1", T0).await }
        });

        let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
        let recorded = outcomes
            .iter()
            .filter(|o| matches!(o, RecomputeOutcome::Recorded { .. }))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o, RecomputeOutcome::Skipped(TurnError::TimeTooShort { .. })))
            .count();

        assert_eq!((recorded, skipped), (1, 1));
        assert_eq!(store.get("sku-1").await.unwrap().unwrap().records.len(), 1);
    }
}
