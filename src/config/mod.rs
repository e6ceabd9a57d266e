//! Configuration module for the Q-Score engine.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Analyzer, Model, Scanner, and Provider.

mod analyzer_config;
mod model_config;
mod provider_config;
mod scanner_config;

pub use analyzer_config::AnalyzerEnvConfig;
pub use model_config::ModelEnvConfig;
pub use provider_config::{
    DEFAULT_SP500_CONSTITUENTS_URL, DEFAULT_YAHOO_BASE_URL, ProviderEnvConfig,
};
pub use scanner_config::ScannerEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Market data backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    Yahoo,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "yahoo" => Ok(ProviderKind::Yahoo),
            _ => anyhow::bail!(
                "Invalid MARKET_DATA_PROVIDER: {}. Must be 'yahoo' or 'mock'",
                s
            ),
        }
    }
}

/// Parse `key` when set, `default` when unset. A set but malformed value is an error.
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        Err(_) => Ok(default),
    }
}

/// String variables; blank counts as unset.
fn parse_var_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Main application configuration.
///
/// This struct aggregates all configuration from sub-modules into flat fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Provider (from ProviderEnvConfig)
    pub provider: ProviderKind,
    pub yahoo_base_url: String,
    pub sp500_constituents_url: String,
    pub http_max_retries: u32,

    // Analyzer (from AnalyzerEnvConfig)
    pub benchmark_symbol: String,
    pub history_period: String,
    pub history_interval: String,
    pub zscore_window: usize,
    pub rs_lag: usize,
    pub volatility_window: usize,
    pub volume_lookback: usize,
    pub label_horizon: usize,
    pub label_threshold: f64,
    pub neutral_consensus: f64,

    // Model (from ModelEnvConfig)
    pub model_trees: usize,
    pub model_max_depth: u16,
    pub model_min_split: usize,
    pub model_train_fraction: f64,
    pub model_seed: u64,

    // Scanner (from ScannerEnvConfig)
    pub scan_sample_size: usize,
    pub scan_seed: Option<u64>,
    pub scan_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(
            ProviderEnvConfig::default(),
            AnalyzerEnvConfig::default(),
            ModelEnvConfig::default(),
            ScannerEnvConfig::default(),
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let provider = ProviderEnvConfig::from_env().context("Failed to load provider config")?;
        let analyzer = AnalyzerEnvConfig::from_env().context("Failed to load analyzer config")?;
        let model = ModelEnvConfig::from_env().context("Failed to load model config")?;
        let scanner = ScannerEnvConfig::from_env().context("Failed to load scanner config")?;

        Ok(Self::compose(provider, analyzer, model, scanner))
    }

    fn compose(
        provider: ProviderEnvConfig,
        analyzer: AnalyzerEnvConfig,
        model: ModelEnvConfig,
        scanner: ScannerEnvConfig,
    ) -> Self {
        Self {
            // Provider
            provider: provider.provider,
            yahoo_base_url: provider.yahoo_base_url,
            sp500_constituents_url: provider.sp500_constituents_url,
            http_max_retries: provider.http_max_retries,

            // Analyzer
            benchmark_symbol: analyzer.benchmark_symbol,
            history_period: analyzer.history_period,
            history_interval: analyzer.history_interval,
            zscore_window: analyzer.zscore_window,
            rs_lag: analyzer.rs_lag,
            volatility_window: analyzer.volatility_window,
            volume_lookback: analyzer.volume_lookback,
            label_horizon: analyzer.label_horizon,
            label_threshold: analyzer.label_threshold,
            neutral_consensus: analyzer.neutral_consensus,

            // Model
            model_trees: model.trees,
            model_max_depth: model.max_depth,
            model_min_split: model.min_split,
            model_train_fraction: model.train_fraction,
            model_seed: model.seed,

            // Scanner
            scan_sample_size: scanner.sample_size,
            scan_seed: scanner.seed,
            scan_concurrency: scanner.concurrency,
        }
    }
}
