//! Turn record calculator
//!
//! Turns a present/departed snapshot over a time window into a single
//! daily-turn sample.

use crate::error::TurnError;
use crate::models::turnover::{PresenceCounts, TurnRecord};
use crate::services::confidence::MILLIS_PER_DAY;

/// Minimum window length between two samples, in days
pub const MINIMUM_ELAPSED_DAYS: f64 = 1.0;

/// Daily turn for a window: departed share of inventory, per elapsed day.
///
/// Fails with `NoInventory` when nothing was counted (checked first) and
/// with `TimeTooShort` when the window is shorter than one full day.
pub fn calculate_daily_turn(
    present_count: u64,
    departed_count: u64,
    timestamp: i64,
    previous_timestamp: i64,
) -> Result<f64, TurnError> {
    let total = present_count.saturating_add(departed_count);
    if total == 0 {
        return Err(TurnError::NoInventory);
    }

    let elapsed_days = timestamp.saturating_sub(previous_timestamp) as f64 / MILLIS_PER_DAY;
    if elapsed_days < MINIMUM_ELAPSED_DAYS {
        return Err(TurnError::TimeTooShort { elapsed_days });
    }

    Ok((departed_count as f64 / total as f64 / elapsed_days).abs())
}

/// Build the record for the window `(previous_timestamp, timestamp]`
pub fn build_turn_record(
    counts: PresenceCounts,
    timestamp: i64,
    previous_timestamp: i64,
) -> Result<TurnRecord, TurnError> {
    let daily_turn = calculate_daily_turn(
        counts.present_count,
        counts.departed_count,
        timestamp,
        previous_timestamp,
    )?;

    Ok(TurnRecord {
        present_count: counts.present_count,
        departed_count: counts.departed_count,
        daily_turn,
        previous_timestamp,
        timestamp,
    })
}
