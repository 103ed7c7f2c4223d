//! Error types for the turnover engine

use thiserror::Error;

/// Reasons a turn record cannot be computed yet.
///
/// These mean "not enough signal" and are never surfaced as batch failures.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TurnError {
    #[error("no inventory: present and departed counts are both zero")]
    NoInventory,
    #[error("time too short: {elapsed_days:.3} days elapsed, at least 1 required")]
    TimeTooShort { elapsed_days: f64 },
}

/// Failures reading or writing turnover state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} failed for product {product_id}: {source}")]
    Database {
        product_id: String,
        operation: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },
    #[error("failed to (de)serialize history for product {product_id}: {source}")]
    Serialization {
        product_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn database(product_id: &str, operation: &'static str, source: sea_orm::DbErr) -> Self {
        StoreError::Database {
            product_id: product_id.to_string(),
            operation,
            source,
        }
    }

    pub fn product_id(&self) -> &str {
        match self {
            StoreError::Database { product_id, .. } => product_id,
            StoreError::Serialization { product_id, .. } => product_id,
        }
    }
}

/// Invalid configuration, rejected at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("minimum data points must be at least 1")]
    MinimumDataPoints,
    #[error("history maximum ({history_maximum}) is below minimum data points ({minimum_data_points})")]
    HistoryBelowMinimum {
        history_maximum: usize,
        minimum_data_points: usize,
    },
    #[error("confidence coefficient {name} must be within [0, 1], got {value}")]
    CoefficientOutOfRange { name: &'static str, value: f64 },
}
