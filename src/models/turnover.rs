//! Turnover history models
//!
//! `History` is stored once per product id and serialized as-is by the
//! GET /api/turnover/{product_id} endpoint.

use serde::{Deserialize, Serialize};

/// One incremental turnover sample. Never edited once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub present_count: u64,
    pub departed_count: u64,
    pub daily_turn: f64,
    /// Start of the sampled window (ms since epoch)
    pub previous_timestamp: i64,
    /// End of the sampled window (ms since epoch)
    pub timestamp: i64,
}

/// Turnover state for a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub product_id: String,
    /// Rolling estimate; 0 until `minimum_data_points` records exist
    pub daily_turn: f64,
    /// Newest first
    pub records: Vec<TurnRecord>,
    /// Time of the last computation (ms since epoch)
    pub timestamp: i64,
}

impl History {
    /// Fresh history with no records, anchored at `now_ms`
    pub fn bootstrap(product_id: &str, now_ms: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            daily_turn: 0.0,
            records: Vec::new(),
            timestamp: now_ms,
        }
    }
}

/// Present/departed counts for a product since some point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceCounts {
    pub present_count: u64,
    pub departed_count: u64,
}
