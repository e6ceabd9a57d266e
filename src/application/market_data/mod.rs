pub mod statistical_features;
