use crate::domain::scoring::{FEATURE_COUNT, FeatureVector};
use statrs::statistics::Statistics;

/// Per-feature standardization: `(x - mean) / scale`.
///
/// Fitted on the training rows only. Features with zero spread keep a
/// scale of 1.0 so they pass through centered but unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    means: FeatureVector,
    scales: FeatureVector,
}

impl FeatureScaler {
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut means = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { means, scales };
        }

        for col in 0..FEATURE_COUNT {
            let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            let mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();

            means[col] = if mean.is_finite() { mean } else { 0.0 };
            scales[col] = if std_dev.is_finite() && std_dev > 0.0 {
                std_dev
            } else {
                1.0
            };
        }

        Self { means, scales }
    }

    pub fn means(&self) -> &FeatureVector {
        &self.means
    }

    pub fn scales(&self) -> &FeatureVector {
        &self.scales
    }

    pub fn transform_row(&self, row: &FeatureVector) -> FeatureVector {
        std::array::from_fn(|col| (row[col] - self.means[col]) / self.scales[col])
    }

    /// Rows as the `Vec<Vec<f64>>` layout `DenseMatrix::from_2d_vec` expects.
    pub fn transform(&self, rows: &[FeatureVector]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|r| self.transform_row(r).to_vec())
            .collect()
    }
}
