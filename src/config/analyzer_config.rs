//! Analyzer configuration parsing from environment variables.
//!
//! Benchmark, history request shape, feature windows and label definition.

use super::{parse_var, parse_var_or};
use anyhow::Result;

/// Analyzer environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerEnvConfig {
    pub benchmark_symbol: String,
    pub history_period: String,
    pub history_interval: String,

    // Feature windows
    pub zscore_window: usize,
    pub rs_lag: usize,
    pub volatility_window: usize,
    pub volume_lookback: usize,

    // Label
    pub label_horizon: usize,
    pub label_threshold: f64,

    pub neutral_consensus: f64,
}

impl Default for AnalyzerEnvConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "SPY".to_string(),
            history_period: "2y".to_string(),
            history_interval: "1d".to_string(),
            zscore_window: 20,
            rs_lag: 5,
            volatility_window: 10,
            volume_lookback: 20,
            label_horizon: 10,
            label_threshold: 0.02,
            neutral_consensus: 3.0,
        }
    }
}

impl AnalyzerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            benchmark_symbol: parse_var_or("BENCHMARK_SYMBOL", defaults.benchmark_symbol),
            history_period: parse_var_or("HISTORY_PERIOD", defaults.history_period),
            history_interval: parse_var_or("HISTORY_INTERVAL", defaults.history_interval),
            zscore_window: parse_var("ZSCORE_WINDOW", defaults.zscore_window)?,
            rs_lag: parse_var("RS_LAG", defaults.rs_lag)?,
            volatility_window: parse_var("VOLATILITY_WINDOW", defaults.volatility_window)?,
            volume_lookback: parse_var("VOLUME_LOOKBACK", defaults.volume_lookback)?,
            label_horizon: parse_var("LABEL_HORIZON", defaults.label_horizon)?,
            label_threshold: parse_var("LABEL_THRESHOLD", defaults.label_threshold)?,
            neutral_consensus: parse_var("NEUTRAL_CONSENSUS", defaults.neutral_consensus)?,
        })
    }
}
