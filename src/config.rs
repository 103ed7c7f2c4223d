//! Turnover engine configuration
//!
//! Loaded from environment variables at startup and passed explicitly into
//! the service. Every value has a default; a value that is present but does
//! not parse is rejected rather than silently defaulted.

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

pub const ENV_MINIMUM_DATA_POINTS: &str = "TURNOVER_MINIMUM_DATA_POINTS";
pub const ENV_HISTORY_MAXIMUM: &str = "TURNOVER_HISTORY_MAXIMUM";
pub const ENV_USE_MEDIAN: &str = "TURNOVER_USE_MEDIAN";
pub const ENV_DAILY_INVENTORY_PERCENTAGE: &str = "CONFIDENCE_DAILY_INVENTORY_PERCENTAGE";
pub const ENV_PROB_UNREAD_TO_READ: &str = "CONFIDENCE_PROB_UNREAD_TO_READ";
pub const ENV_PROB_IN_STORE_READ: &str = "CONFIDENCE_PROB_IN_STORE_READ";
pub const ENV_PROB_EXIT_ERROR: &str = "CONFIDENCE_PROB_EXIT_ERROR";

const DEFAULT_MINIMUM_DATA_POINTS: usize = 3;
const DEFAULT_HISTORY_MAXIMUM: usize = 30;

/// Calibration coefficients for the presence-confidence model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCoefficients {
    /// Fraction of on-hand inventory expected to leave per day
    pub daily_inventory_percentage: f64,
    /// Daily probability an unread tag gets read again
    pub prob_unread_to_read: f64,
    /// Probability a tag in the store is read on a given pass
    pub prob_in_store_read: f64,
    /// Probability a departing tag is missed by the exit readers
    pub prob_exit_error: f64,
}

impl Default for ConfidenceCoefficients {
    fn default() -> Self {
        Self {
            daily_inventory_percentage: 0.01,
            prob_unread_to_read: 0.20,
            prob_in_store_read: 0.75,
            prob_exit_error: 0.10,
        }
    }
}

impl ConfidenceCoefficients {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("daily_inventory_percentage", self.daily_inventory_percentage),
            ("prob_unread_to_read", self.prob_unread_to_read),
            ("prob_in_store_read", self.prob_in_store_read),
            ("prob_exit_error", self.prob_exit_error),
        ];

        for (name, value) in named {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::CoefficientOutOfRange { name, value });
            }
        }

        Ok(())
    }
}

/// Configuration consumed by the history aggregator and ingestion pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TurnoverConfig {
    pub minimum_data_points: usize,
    pub history_maximum: usize,
    pub use_median: bool,
    pub confidence: ConfidenceCoefficients,
}

impl Default for TurnoverConfig {
    fn default() -> Self {
        Self {
            minimum_data_points: DEFAULT_MINIMUM_DATA_POINTS,
            history_maximum: DEFAULT_HISTORY_MAXIMUM,
            use_median: false,
            confidence: ConfidenceCoefficients::default(),
        }
    }
}

impl TurnoverConfig {
    /// Load from process environment and validate
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup and validate
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            minimum_data_points: parse_or(&lookup, ENV_MINIMUM_DATA_POINTS, defaults.minimum_data_points)?,
            history_maximum: parse_or(&lookup, ENV_HISTORY_MAXIMUM, defaults.history_maximum)?,
            use_median: parse_bool_or(&lookup, ENV_USE_MEDIAN, defaults.use_median)?,
            confidence: ConfidenceCoefficients {
                daily_inventory_percentage: parse_or(
                    &lookup,
                    ENV_DAILY_INVENTORY_PERCENTAGE,
                    defaults.confidence.daily_inventory_percentage,
                )?,
                prob_unread_to_read: parse_or(
                    &lookup,
                    ENV_PROB_UNREAD_TO_READ,
                    defaults.confidence.prob_unread_to_read,
                )?,
                prob_in_store_read: parse_or(
                    &lookup,
                    ENV_PROB_IN_STORE_READ,
                    defaults.confidence.prob_in_store_read,
                )?,
                prob_exit_error: parse_or(
                    &lookup,
                    ENV_PROB_EXIT_ERROR,
                    defaults.confidence.prob_exit_error,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the minimum unreachable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_data_points == 0 {
            return Err(ConfigError::MinimumDataPoints);
        }

        if self.history_maximum < self.minimum_data_points {
            return Err(ConfigError::HistoryBelowMinimum {
                history_maximum: self.history_maximum,
                minimum_data_points: self.minimum_data_points,
            });
        }

        self.confidence.validate()
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
