//! Classifier configuration parsing from environment variables.

use super::parse_var;
use anyhow::{Result, bail};

/// Model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub trees: usize,
    pub max_depth: u16,
    pub min_split: usize,
    pub train_fraction: f64,
    pub seed: u64,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 4,
            min_split: 2,
            train_fraction: 0.8,
            seed: 42,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let train_fraction = parse_var("MODEL_TRAIN_FRACTION", defaults.train_fraction)?;
        if train_fraction.is_nan() || train_fraction <= 0.0 || train_fraction >= 1.0 {
            bail!(
                "Invalid MODEL_TRAIN_FRACTION: {}. Must be between 0 and 1 (exclusive)",
                train_fraction
            );
        }

        let trees = parse_var("MODEL_TREES", defaults.trees)?;
        if trees == 0 {
            bail!("Invalid MODEL_TREES: must be at least 1");
        }

        Ok(Self {
            trees,
            max_depth: parse_var("MODEL_MAX_DEPTH", defaults.max_depth)?,
            min_split: parse_var("MODEL_MIN_SPLIT", defaults.min_split)?,
            train_fraction,
            seed: parse_var("MODEL_SEED", defaults.seed)?,
        })
    }
}
