//! Presence confidence estimator
//!
//! Estimates the probability that a tag is still where it was last seen,
//! given how long ago it was read. Time decays confidence through two
//! competing explanations for silence: the tag is in the store but unread,
//! or it left without the exit readers noticing.

use chrono::Utc;

use crate::config::ConfidenceCoefficients;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Confidence at the current wall-clock time
pub fn estimate_confidence(
    coefficients: &ConfidenceCoefficients,
    last_read_ms: i64,
    is_contra_reading: bool,
) -> f64 {
    estimate_confidence_at(
        coefficients,
        last_read_ms,
        is_contra_reading,
        Utc::now().timestamp_millis(),
    )
}

/// Confidence in [-1, 1], rounded half-up to 3 decimals.
///
/// Negative when `is_contra_reading` is set. A read at `now_ms` is fully
/// trusted. Otherwise a zero denominator (both explanations impossible)
/// yields 0. Reads stamped in the future are treated as reads at `now_ms`.
pub fn estimate_confidence_at(
    coefficients: &ConfidenceCoefficients,
    last_read_ms: i64,
    is_contra_reading: bool,
    now_ms: i64,
) -> f64 {
    let days = now_ms.saturating_sub(last_read_ms).max(0) as f64 / MILLIS_PER_DAY;
    if days == 0.0 {
        return signed(1.0, is_contra_reading);
    }

    let prob_still_in_store = (1.0 - coefficients.daily_inventory_percentage).powf(days);
    let prob_not_detected =
        (1.0 - coefficients.prob_in_store_read) * (1.0 - coefficients.prob_unread_to_read).powf(days);
    let prob_out_of_store = 1.0 - prob_still_in_store;

    let in_store_unread = prob_still_in_store * prob_not_detected;
    let denominator = in_store_unread + coefficients.prob_exit_error * prob_out_of_store;

    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let confidence = round_half_up(in_store_unread / denominator);
    if !confidence.is_finite() || confidence == 0.0 {
        return 0.0;
    }

    signed(confidence, is_contra_reading)
}

fn signed(confidence: f64, is_contra_reading: bool) -> f64 {
    if is_contra_reading {
        -confidence
    } else {
        confidence
    }
}

fn round_half_up(value: f64) -> f64 {
    (value * 1000.0 + 0.5).floor() / 1000.0
}
