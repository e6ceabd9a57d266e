pub mod classifier;
pub mod dataset;
pub mod scaler;
