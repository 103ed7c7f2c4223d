//! History aggregator
//!
//! Keeps the record list bounded and recomputes the rolling daily-turn
//! statistic. Below the minimum number of records the estimate is 0.

use crate::config::TurnoverConfig;
use crate::models::turnover::{History, TurnRecord};

/// How the rolling statistic is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    Mean,
    Median,
}

impl AggregationMode {
    pub fn from_config(config: &TurnoverConfig) -> Self {
        if config.use_median {
            AggregationMode::Median
        } else {
            AggregationMode::Mean
        }
    }
}

/// Rolling daily turn over `records`, or 0 below `minimum_data_points`
pub fn aggregate_daily_turn(
    records: &[TurnRecord],
    minimum_data_points: usize,
    mode: AggregationMode,
) -> f64 {
    if records.is_empty() || records.len() < minimum_data_points {
        return 0.0;
    }

    match mode {
        AggregationMode::Mean => mean(records),
        AggregationMode::Median => median(records),
    }
}

fn mean(records: &[TurnRecord]) -> f64 {
    let sum: f64 = records.iter().map(|r| r.daily_turn).sum();
    sum / records.len() as f64
}

/// Median over a sorted copy; record order is left untouched
fn median(records: &[TurnRecord]) -> f64 {
    let mut values: Vec<f64> = records.iter().map(|r| r.daily_turn).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

impl History {
    /// Add `record` as the newest entry and evict the oldest beyond `history_maximum`
    pub fn push_record(&mut self, record: TurnRecord, history_maximum: usize) {
        self.records.insert(0, record);
        self.records.truncate(history_maximum);
    }

    /// Recompute `daily_turn` from the current records
    pub fn recompute_daily_turn(&mut self, config: &TurnoverConfig) {
        self.daily_turn = aggregate_daily_turn(
            &self.records,
            config.minimum_data_points,
            AggregationMode::from_config(config),
        );
    }

    /// Append a sample and refresh the aggregate, advancing the timestamp
    pub fn apply_record(&mut self, record: TurnRecord, config: &TurnoverConfig) {
        let timestamp = record.timestamp;
        self.push_record(record, config.history_maximum);
        self.recompute_daily_turn(config);
        self.timestamp = timestamp;
    }
}
