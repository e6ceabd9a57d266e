use serde::{Deserialize, Serialize};

/// Fundamental metadata for a ticker. Only the analyst consensus is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Mean analyst recommendation, 1 = strong buy ... 5 = strong sell
    pub recommendation_mean: Option<f64>,
}

impl Fundamentals {
    pub fn with_recommendation(mean: f64) -> Self {
        Self {
            recommendation_mean: Some(mean),
        }
    }

    /// Consensus if present and finite, otherwise `neutral`.
    pub fn consensus_or(&self, neutral: f64) -> f64 {
        self.recommendation_mean
            .filter(|m| m.is_finite())
            .unwrap_or(neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consensus_defaults_to_neutral() {
        assert_eq!(Fundamentals::default().consensus_or(3.0), 3.0);
        let missing = Fundamentals::with_recommendation(f64::NAN);
        assert_eq!(missing.consensus_or(3.0), 3.0);
        let rated = Fundamentals::with_recommendation(1.8);
        assert_eq!(rated.consensus_or(3.0), 1.8);
    }
}
