use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 3;

/// Ordered list of model features.
/// Any change here changes the column layout seen by the scaler and the trees.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["z_score", "relative_strength", "volatility"];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Features for one aligned date. `None` marks an unfilled trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub close: f64,
    pub z_score: Option<f64>,
    pub relative_strength: Option<f64>,
    pub volatility: Option<f64>,
}

impl FeatureRow {
    pub fn is_complete(&self) -> bool {
        self.to_vector().is_some()
    }

    /// Feature vector in `FEATURE_NAMES` order, only when all three are defined.
    pub fn to_vector(&self) -> Option<FeatureVector> {
        Some([self.z_score?, self.relative_strength?, self.volatility?])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledRow {
    pub date: NaiveDate,
    pub features: FeatureVector,
    pub label: u32,
}

/// Complete feature rows paired with their forward label, in time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    rows: Vec<LabeledRow>,
}

impl LabeledDataset {
    pub fn new(rows: Vec<LabeledRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LabeledRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn features(&self) -> Vec<FeatureVector> {
        self.rows.iter().map(|r| r.features).collect()
    }

    pub fn labels(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.label).collect()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().filter(|r| r.label == 1).count() as f64 / self.rows.len() as f64
    }
}

/// Per-ticker scoring output. Built once by the analyzer and handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ticker: String,
    /// Last aligned close, rounded to cents
    pub price: Decimal,
    /// Model probability of a >2% gain over the label horizon
    pub probability: f64,
    /// Held-out accuracy of the model that produced `probability`
    pub accuracy: f64,
    /// Composite score, nominally 0-100 but not clamped
    pub q_score: f64,
    pub analyst_consensus: f64,
    pub relative_volume: f64,
}

impl ScoreResult {
    pub fn is_finite(&self) -> bool {
        self.probability.is_finite()
            && self.accuracy.is_finite()
            && self.q_score.is_finite()
            && self.relative_volume.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(z: Option<f64>, rs: Option<f64>, vol: Option<f64>) -> FeatureRow {
        FeatureRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            close: 100.0,
            z_score: z,
            relative_strength: rs,
            volatility: vol,
        }
    }

    #[test]
    fn test_to_vector_requires_all_features() {
        assert_eq!(
            row(Some(1.0), Some(0.1), Some(0.02)).to_vector(),
            Some([1.0, 0.1, 0.02])
        );
        assert!(!row(None, Some(0.1), Some(0.02)).is_complete());
        assert!(!row(Some(1.0), None, Some(0.02)).is_complete());
        assert!(!row(Some(1.0), Some(0.1), None).is_complete());
    }

    #[test]
    fn test_positive_rate() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let labeled = |label| LabeledRow {
            date,
            features: [0.0; FEATURE_COUNT],
            label,
        };
        let dataset = LabeledDataset::new(vec![labeled(1), labeled(0), labeled(0), labeled(1)]);
        assert_eq!(dataset.positive_rate(), 0.5);
        assert_eq!(LabeledDataset::default().positive_rate(), 0.0);
    }
}
