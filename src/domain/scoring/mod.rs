pub mod composite;
pub mod types;

pub use composite::{NEUTRAL_CONSENSUS, composite_score, relative_volume};
pub use types::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureRow, FeatureVector, LabeledDataset, LabeledRow,
    ScoreResult,
};
