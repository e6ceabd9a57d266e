use thiserror::Error;

/// Reasons a single-ticker analysis produced no score.
///
/// Every variant is contained inside the analyzer: callers either inspect the
/// `Result` or use `analyze_or_none`, which turns any of these into `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("No price history for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("No overlapping dates between {ticker} and benchmark {benchmark}")]
    AlignmentEmpty { ticker: String, benchmark: String },

    #[error("No complete feature rows for {ticker}")]
    InsufficientFeatureData { ticker: String },

    #[error("Insufficient data to train: {rows} labeled rows")]
    InsufficientData { rows: usize },

    #[error("Model failure: {reason}")]
    ModelFailure { reason: String },
}

impl AnalysisError {
    /// Short machine-readable tag, used in log fields and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::DataUnavailable { .. } => "data_unavailable",
            AnalysisError::AlignmentEmpty { .. } => "alignment_empty",
            AnalysisError::InsufficientFeatureData { .. } => "insufficient_feature_data",
            AnalysisError::InsufficientData { .. } => "insufficient_data",
            AnalysisError::ModelFailure { .. } => "model_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_formatting() {
        let error = AnalysisError::AlignmentEmpty {
            ticker: "WALMEX.MX".to_string(),
            benchmark: "SPY".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("WALMEX.MX"));
        assert!(msg.contains("SPY"));
        assert_eq!(error.kind(), "alignment_empty");
    }

    #[test]
    fn test_insufficient_data_formatting() {
        let error = AnalysisError::InsufficientData { rows: 1 };
        assert_eq!(
            error.to_string(),
            "Insufficient data to train: 1 labeled rows"
        );
        assert_eq!(error.kind(), "insufficient_data");
    }
}
