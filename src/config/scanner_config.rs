//! Scanner configuration parsing from environment variables.

use super::parse_var;
use anyhow::{Context, Result};
use std::env;

/// Scanner environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerEnvConfig {
    pub sample_size: usize,
    /// `None` draws a fresh sample on every scan
    pub seed: Option<u64>,
    pub concurrency: usize,
}

impl Default for ScannerEnvConfig {
    fn default() -> Self {
        Self {
            sample_size: 20,
            seed: None,
            concurrency: 1,
        }
    }
}

impl ScannerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let seed = match env::var("SCAN_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .context("Failed to parse SCAN_SEED")?,
            ),
            _ => None,
        };

        Ok(Self {
            sample_size: parse_var("SCAN_SAMPLE_SIZE", defaults.sample_size)?,
            seed,
            concurrency: parse_var("SCAN_CONCURRENCY", defaults.concurrency)?.max(1),
        })
    }
}
