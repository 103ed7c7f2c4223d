//! Turnover persistence
//!
//! `TurnoverStore` is a whole-object key-value store for `History`, keyed by
//! product id; `PresenceSnapshot` counts tag states. Upserts replace the
//! full row. There is no compare-and-swap, so callers serialize per product.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{prelude::*, tags, turnover_history};
use crate::error::StoreError;
use crate::models::turnover::{History, PresenceCounts, TurnRecord};
use crate::services::presence_snapshot::{count_presence, TagState, DEPARTED_EVENT};

#[async_trait]
pub trait TurnoverStore: Send + Sync {
    async fn get(&self, product_id: &str) -> Result<Option<History>, StoreError>;

    async fn upsert(&self, history: &History) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PresenceSnapshot: Send + Sync {
    /// Present/departed counts for a product since `since_ms`
    async fn query(&self, product_id: &str, since_ms: i64) -> Result<PresenceCounts, StoreError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct SeaOrmTurnoverStore {
    db: DatabaseConnection,
}

impl SeaOrmTurnoverStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TurnoverStore for SeaOrmTurnoverStore {
    async fn get(&self, product_id: &str) -> Result<Option<History>, StoreError> {
        let row = TurnoverHistory::find()
            .filter(turnover_history::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database(product_id, "history read", e))?;

        row.map(history_from_model).transpose()
    }

    async fn upsert(&self, history: &History) -> Result<(), StoreError> {
        let records = serde_json::to_value(&history.records).map_err(|e| {
            StoreError::Serialization {
                product_id: history.product_id.clone(),
                source: e,
            }
        })?;

        let model = turnover_history::ActiveModel {
            product_id: Set(history.product_id.clone()),
            daily_turn: Set(history.daily_turn),
            records: Set(records),
            timestamp: Set(history.timestamp),
            updated_at: Set(Some(Utc::now().fixed_offset())),
            ..Default::default()
        };

        TurnoverHistory::insert(model)
            .on_conflict(
                OnConflict::column(turnover_history::Column::ProductId)
                    .update_columns([
                        turnover_history::Column::DailyTurn,
                        turnover_history::Column::Records,
                        turnover_history::Column::Timestamp,
                        turnover_history::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| StoreError::database(&history.product_id, "history upsert", e))?;

        tracing::debug!(
            product_id = %history.product_id,
            records = history.records.len(),
            daily_turn = history.daily_turn,
            "Upserted turnover history"
        );

        Ok(())
    }
}

#[async_trait]
impl PresenceSnapshot for SeaOrmTurnoverStore {
    async fn query(&self, product_id: &str, since_ms: i64) -> Result<PresenceCounts, StoreError> {
        let rows = Tags::find()
            .filter(tags::Column::ProductId.eq(product_id))
            .filter(tags::Column::LastRead.gt(0))
            .filter(
                Condition::any()
                    .add(tags::Column::Event.ne(DEPARTED_EVENT))
                    .add(tags::Column::LastRead.gt(since_ms)),
            )
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database(product_id, "presence snapshot", e))?;

        let states: Vec<TagState> = rows.into_iter().map(TagState::from).collect();
        Ok(count_presence(&states, since_ms))
    }
}

fn history_from_model(model: turnover_history::Model) -> Result<History, StoreError> {
    let records: Vec<TurnRecord> =
        serde_json::from_value(model.records).map_err(|e| StoreError::Serialization {
            product_id: model.product_id.clone(),
            source: e,
        })?;

    Ok(History {
        product_id: model.product_id,
        daily_turn: model.daily_turn,
        records,
        timestamp: model.timestamp,
    })
}
