// Market data domain (price series, fundamentals, universes)
pub mod market;

// Port interfaces
pub mod ports;

// Scoring domain (features, labels, composite score)
pub mod scoring;

// Domain-specific error types
pub mod errors;
