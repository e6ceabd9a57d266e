//! Composite Q-Score formula and its volume input.
//!
//! `score = probability * 50 + (5 - consensus) * 10 + min(relative_volume, 2) * 10`
//!
//! Probability contributes up to 50 points, analyst sentiment up to 40
//! (inverted: 1 = strong buy), relative volume up to 20. The result is not
//! clamped; a consensus below 1 or a probability of 1 with strong volume can
//! push it past 100.

use rust_decimal::Decimal;

pub const PROBABILITY_WEIGHT: f64 = 50.0;
pub const CONSENSUS_WEIGHT: f64 = 10.0;
pub const CONSENSUS_CEILING: f64 = 5.0;
pub const VOLUME_WEIGHT: f64 = 10.0;
pub const RELATIVE_VOLUME_CAP: f64 = 2.0;

/// Consensus used when fundamentals carry no recommendation.
pub const NEUTRAL_CONSENSUS: f64 = 3.0;

pub fn composite_score(probability: f64, analyst_consensus: f64, relative_volume: f64) -> f64 {
    probability * PROBABILITY_WEIGHT
        + (CONSENSUS_CEILING - analyst_consensus) * CONSENSUS_WEIGHT
        + relative_volume.min(RELATIVE_VOLUME_CAP) * VOLUME_WEIGHT
}

/// Last volume over the mean of up to `lookback` preceding volumes.
///
/// Returns exactly 0.0 when there is no history, the mean is zero, or any
/// input makes the ratio non-finite.
pub fn relative_volume(volumes: &[f64], lookback: usize) -> f64 {
    let Some((&today, history)) = volumes.split_last() else {
        return 0.0;
    };
    let start = history.len().saturating_sub(lookback);
    let trailing = &history[start..];
    if trailing.is_empty() {
        return 0.0;
    }

    let mean = trailing.iter().sum::<f64>() / trailing.len() as f64;
    if !mean.is_finite() || mean <= 0.0 {
        return 0.0;
    }

    let ratio = today / mean;
    if ratio.is_finite() { ratio.max(0.0) } else { 0.0 }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price as a cent-rounded decimal; non-finite prices map to zero.
pub fn price_to_cents(price: f64) -> Decimal {
    Decimal::from_f64_retain(price)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}
