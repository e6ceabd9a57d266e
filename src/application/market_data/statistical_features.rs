//! Rolling statistical features over an aligned daily close series
//!
//! This module provides calculations for:
//! - Z-Score (distance from the rolling mean in rolling standard deviations)
//! - Relative strength against a benchmark
//! - Realized volatility of log returns
//!
//! Every function returns one entry per input position. `None` marks a
//! position whose trailing window is not yet filled (or is degenerate); values
//! only ever depend on the current and earlier positions.

use statrs::statistics::{Data, Distribution};

/// Standard deviations at or below this fraction of the window mean are
/// treated as zero (a flat window).
const FLAT_WINDOW_TOLERANCE: f64 = 1e-12;

/// Sample mean and sample standard deviation (n - 1) of a window.
fn window_stats(window: &[f64]) -> Option<(f64, f64)> {
    if window.len() < 2 {
        return None;
    }
    let data = Data::new(window.to_vec());
    let mean = data.mean()?;
    let std_dev = data.std_dev()?;

    if mean.is_finite() && std_dev.is_finite() {
        Some((mean, std_dev))
    } else {
        None
    }
}

fn is_flat(mean: f64, std_dev: f64) -> bool {
    std_dev <= FLAT_WINDOW_TOLERANCE * mean.abs().max(1.0)
}

/// Calculate the rolling Z-Score series
///
/// Output at position `i` is `(price[i] - mean) / std` over the `window`
/// observations ending at `i`.
///
/// # Returns
/// * `None` for the first `window - 1` positions
/// * `None` where the window is flat (zero standard deviation)
pub fn calculate_zscore_series(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if window < 2 {
        return out;
    }

    for i in (window - 1)..prices.len() {
        let slice = &prices[i + 1 - window..=i];
        let Some((mean, std_dev)) = window_stats(slice) else {
            continue;
        };
        if is_flat(mean, std_dev) {
            continue;
        }
        let z = (prices[i] - mean) / std_dev;
        if z.is_finite() {
            out[i] = Some(z);
        }
    }

    out
}

/// Simple return over `lag` positions: `price[i] / price[i - lag] - 1`.
fn lagged_return(prices: &[f64], i: usize, lag: usize) -> Option<f64> {
    let base = prices[i.checked_sub(lag)?];
    if base == 0.0 {
        return None;
    }
    let ret = prices[i] / base - 1.0;
    ret.is_finite().then_some(ret)
}

/// Calculate relative strength of a ticker against a benchmark
///
/// Output at position `i` is the ticker's `lag`-period return minus the
/// benchmark's return over the same positions. Both slices must share one
/// index; extra positions in the longer slice are ignored.
///
/// # Returns
/// * `None` for the first `lag` positions
pub fn calculate_relative_strength_series(
    ticker: &[f64],
    benchmark: &[f64],
    lag: usize,
) -> Vec<Option<f64>> {
    let len = ticker.len().min(benchmark.len());
    (0..len)
        .map(|i| {
            let ticker_ret = lagged_return(ticker, i, lag)?;
            let benchmark_ret = lagged_return(benchmark, i, lag)?;
            Some(ticker_ret - benchmark_ret)
        })
        .collect()
}

/// Calculate rolling realized volatility
///
/// Output at position `i` is the sample standard deviation of the `window`
/// log returns `ln(price[k] / price[k - 1])` for `k` in `i - window + 1 ..= i`.
/// A constant price gives a defined volatility of zero.
///
/// # Returns
/// * `None` for the first `window` positions
/// * `None` where any log return in the window is undefined (non-positive price)
pub fn calculate_volatility_series(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if window < 2 || prices.len() <= window {
        return out;
    }

    // log_returns[k] is the return ending at price index k; index 0 has none
    let log_returns: Vec<Option<f64>> = (0..prices.len())
        .map(|k| {
            if k == 0 || prices[k - 1] <= 0.0 || prices[k] <= 0.0 {
                return None;
            }
            let r = (prices[k] / prices[k - 1]).ln();
            r.is_finite().then_some(r)
        })
        .collect();

    for i in window..prices.len() {
        let returns: Option<Vec<f64>> = log_returns[i + 1 - window..=i].iter().copied().collect();
        let Some(returns) = returns else {
            continue;
        };
        if let Some((_, std_dev)) = window_stats(&returns) {
            out[i] = Some(std_dev);
        }
    }

    out
}
