//! Bagged decision-tree classifier and the per-ticker trainer.
//!
//! Each ensemble member is a depth-limited smartcore decision tree fitted on a
//! bootstrap resample of the training rows. The positive-class probability is
//! the share of members voting 1.

use super::scaler::FeatureScaler;
use crate::config::Config;
use crate::domain::errors::AnalysisError;
use crate::domain::scoring::{FEATURE_NAMES, FeatureVector, LabeledDataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use std::fmt;
use tracing::{debug, trace};

type Tree = DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    /// Share of rows (time prefix) used for training
    pub train_fraction: f64,
    pub seed: u64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 4,
            min_samples_split: 2,
            train_fraction: 0.8,
            seed: 42,
        }
    }
}

impl From<&Config> for ClassifierParams {
    fn from(config: &Config) -> Self {
        Self {
            n_trees: config.model_trees,
            max_depth: config.model_max_depth,
            min_samples_split: config.model_min_split,
            train_fraction: config.model_train_fraction,
            seed: config.model_seed,
        }
    }
}

fn model_failure(context: &str, error: impl fmt::Display) -> AnalysisError {
    AnalysisError::ModelFailure {
        reason: format!("{}: {}", context, error),
    }
}

enum Member {
    Tree(Box<Tree>),
    /// Bootstrap sample held a single class
    Constant(u32),
}

impl Member {
    fn vote(&self, matrix: &DenseMatrix<f64>, rows: usize) -> Result<Vec<u32>, AnalysisError> {
        match self {
            Member::Tree(tree) => tree
                .predict(matrix)
                .map_err(|e| model_failure("Tree prediction failed", e)),
            Member::Constant(label) => Ok(vec![*label; rows]),
        }
    }
}

pub struct BaggedTreeClassifier {
    members: Vec<Member>,
}

impl fmt::Debug for BaggedTreeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constant = self
            .members
            .iter()
            .filter(|m| matches!(m, Member::Constant(_)))
            .count();
        f.debug_struct("BaggedTreeClassifier")
            .field("members", &self.members.len())
            .field("constant_members", &constant)
            .finish()
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, AnalysisError> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
        .map_err(|e| model_failure("Matrix error", e))
}

impl BaggedTreeClassifier {
    /// Fit `params.n_trees` members on bootstrap resamples of `(x, y)`.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[u32],
        params: &ClassifierParams,
    ) -> Result<Self, AnalysisError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(AnalysisError::ModelFailure {
                reason: format!(
                    "Training shape mismatch: {} rows, {} labels",
                    x.len(),
                    y.len()
                ),
            });
        }

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let tree_params = DecisionTreeClassifierParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split);

        let mut members = Vec::with_capacity(params.n_trees.max(1));
        for _ in 0..params.n_trees.max(1) {
            let picks: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let sample_y: Vec<u32> = picks.iter().map(|&i| y[i]).collect();

            let first = sample_y[0];
            if sample_y.iter().all(|&label| label == first) {
                members.push(Member::Constant(first));
                continue;
            }

            let sample_x: Vec<Vec<f64>> = picks.iter().map(|&i| x[i].clone()).collect();
            let matrix = to_matrix(&sample_x)?;
            let tree = Tree::fit(&matrix, &sample_y, tree_params.clone())
                .map_err(|e| model_failure("Tree fit failed", e))?;
            members.push(Member::Tree(Box::new(tree)));
        }

        Ok(Self { members })
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    /// Fraction of members voting for class 1, per row.
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, AnalysisError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = to_matrix(x)?;
        let mut positive = vec![0usize; x.len()];

        for member in &self.members {
            let votes = member.vote(&matrix, x.len())?;
            for (count, vote) in positive.iter_mut().zip(votes) {
                if vote == 1 {
                    *count += 1;
                }
            }
        }

        let total = self.members.len() as f64;
        Ok(positive.into_iter().map(|c| c as f64 / total).collect())
    }

    /// Majority vote; an exact tie goes to class 0.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u32>, AnalysisError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u32::from(p > 0.5))
            .collect())
    }
}

/// Scaler and ensemble fitted on one ticker's history.
#[derive(Debug)]
pub struct TrainedModel {
    pub scaler: FeatureScaler,
    pub classifier: BaggedTreeClassifier,
    /// Held-out accuracy on the time-suffix test rows
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainedModel {
    /// Positive-class probability for one unscaled feature vector.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, AnalysisError> {
        let scaled = self.scaler.transform(std::slice::from_ref(features));
        self.classifier
            .predict_proba(&scaled)?
            .first()
            .copied()
            .ok_or_else(|| AnalysisError::ModelFailure {
                reason: "No prediction returned".to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassifierTrainer {
    params: ClassifierParams,
}

impl ClassifierTrainer {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Training prefix length: `floor(n * fraction)` clamped to `[1, n - 1]`.
    ///
    /// Only meaningful for `n >= 2`.
    pub fn split_index(n: usize, fraction: f64) -> usize {
        let raw = (n as f64 * fraction).floor();
        let raw = if raw.is_finite() && raw > 0.0 {
            raw as usize
        } else {
            0
        };
        raw.clamp(1, n.saturating_sub(1).max(1))
    }

    pub fn train(&self, dataset: &LabeledDataset) -> Result<TrainedModel, AnalysisError> {
        let n = dataset.len();
        if n < 2 {
            return Err(AnalysisError::InsufficientData { rows: n });
        }

        let split = Self::split_index(n, self.params.train_fraction);
        let features = dataset.features();
        let labels = dataset.labels();
        let (train_x, test_x) = features.split_at(split);
        let (train_y, test_y) = labels.split_at(split);

        let scaler = FeatureScaler::fit(train_x);
        for ((name, mean), scale) in FEATURE_NAMES
            .iter()
            .zip(scaler.means())
            .zip(scaler.scales())
        {
            trace!(
                feature = *name,
                mean,
                scale,
                "ClassifierTrainer: feature scaling"
            );
        }

        let classifier =
            BaggedTreeClassifier::fit(&scaler.transform(train_x), train_y, &self.params)?;

        let predictions = classifier.predict(&scaler.transform(test_x))?;
        let correct = predictions
            .iter()
            .zip(test_y)
            .filter(|(pred, actual)| pred == actual)
            .count();
        let accuracy = correct as f64 / test_y.len() as f64;

        debug!(
            rows = n,
            train_rows = split,
            test_rows = n - split,
            positive_rate = dataset.positive_rate(),
            accuracy,
            "ClassifierTrainer: model fitted"
        );

        Ok(TrainedModel {
            scaler,
            classifier,
            accuracy,
            train_rows: split,
            test_rows: n - split,
        })
    }
}
