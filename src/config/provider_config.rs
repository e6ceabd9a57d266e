//! Market data provider configuration parsing from environment variables.

use super::{ProviderKind, parse_var, parse_var_or};
use anyhow::Result;
use std::str::FromStr;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_SP500_CONSTITUENTS_URL: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500-companies/main/data/constituents.csv";

/// Provider environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEnvConfig {
    pub provider: ProviderKind,
    pub yahoo_base_url: String,
    pub sp500_constituents_url: String,
    pub http_max_retries: u32,
}

impl Default for ProviderEnvConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            sp500_constituents_url: DEFAULT_SP500_CONSTITUENTS_URL.to_string(),
            http_max_retries: 3,
        }
    }
}

impl ProviderEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let provider_str = parse_var_or("MARKET_DATA_PROVIDER", "yahoo".to_string());
        let provider = ProviderKind::from_str(&provider_str)?;

        Ok(Self {
            provider,
            yahoo_base_url: parse_var_or("YAHOO_BASE_URL", defaults.yahoo_base_url)
                .trim_end_matches('/')
                .to_string(),
            sp500_constituents_url: parse_var_or(
                "SP500_CONSTITUENTS_URL",
                defaults.sp500_constituents_url,
            ),
            http_max_retries: parse_var("HTTP_MAX_RETRIES", defaults.http_max_retries)?,
        })
    }
}
