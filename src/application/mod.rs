// Rolling statistical features
pub mod market_data;

pub mod feature_engineering_service;

// Labeling, scaling and the bagged tree classifier
pub mod ml;

// Single-ticker pipeline and batch scanning
pub mod analyzer;
pub mod scanner;
