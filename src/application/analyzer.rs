use crate::application::feature_engineering_service::{FeatureEngineeringService, FeatureParams};
use crate::application::ml::classifier::{ClassifierParams, ClassifierTrainer};
use crate::application::ml::dataset::build_labeled_dataset;
use crate::config::Config;
use crate::domain::errors::AnalysisError;
use crate::domain::market::{AlignedSeries, PriceSeries, align};
use crate::domain::ports::MarketDataService;
use crate::domain::scoring::composite::{price_to_cents, round2};
use crate::domain::scoring::{NEUTRAL_CONSENSUS, ScoreResult, composite_score, relative_volume};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub benchmark_symbol: String,
    pub history_period: String,
    pub history_interval: String,
    pub volume_lookback: usize,
    pub label_horizon: usize,
    pub label_threshold: f64,
    pub neutral_consensus: f64,
    pub features: FeatureParams,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "SPY".to_string(),
            history_period: "2y".to_string(),
            history_interval: "1d".to_string(),
            volume_lookback: 20,
            label_horizon: 10,
            label_threshold: 0.02,
            neutral_consensus: NEUTRAL_CONSENSUS,
            features: FeatureParams::default(),
        }
    }
}

impl From<&Config> for AnalyzerConfig {
    fn from(config: &Config) -> Self {
        Self {
            benchmark_symbol: config.benchmark_symbol.clone(),
            history_period: config.history_period.clone(),
            history_interval: config.history_interval.clone(),
            volume_lookback: config.volume_lookback,
            label_horizon: config.label_horizon,
            label_threshold: config.label_threshold,
            neutral_consensus: config.neutral_consensus,
            features: FeatureParams::from(config),
        }
    }
}

/// Scores one ticker: fetch, align, featurize, train, infer, combine.
///
/// Nothing is cached between calls; every analysis refetches history and
/// retrains from scratch.
pub struct QuantumAnalyzer {
    market_service: Arc<dyn MarketDataService>,
    config: AnalyzerConfig,
    features: FeatureEngineeringService,
    trainer: ClassifierTrainer,
}

impl QuantumAnalyzer {
    pub fn new(
        market_service: Arc<dyn MarketDataService>,
        config: AnalyzerConfig,
        classifier: ClassifierParams,
    ) -> Self {
        let features = FeatureEngineeringService::new(config.features);
        Self {
            market_service,
            config,
            features,
            trainer: ClassifierTrainer::new(classifier),
        }
    }

    pub fn from_config(market_service: Arc<dyn MarketDataService>, config: &Config) -> Self {
        Self::new(
            market_service,
            AnalyzerConfig::from(config),
            ClassifierParams::from(config),
        )
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub async fn analyze(&self, ticker: &str) -> Result<ScoreResult, AnalysisError> {
        let benchmark_symbol = self.config.benchmark_symbol.as_str();
        let (history, benchmark) = tokio::join!(
            self.fetch_history(ticker),
            self.fetch_history(benchmark_symbol)
        );
        let history = history?;
        let benchmark = benchmark?;

        let aligned = Self::align_checked(ticker, &history, &benchmark)?;
        debug!(
            ticker,
            ticker_bars = history.len(),
            benchmark_bars = benchmark.len(),
            aligned_bars = aligned.len(),
            "QuantumAnalyzer: histories aligned"
        );

        let consensus = self.fetch_consensus(ticker).await;
        self.score_aligned(ticker, &aligned, consensus)
    }

    /// `analyze` with every failure logged and mapped to `None`.
    ///
    /// `verbose` only selects the log level of the failure reason.
    pub async fn analyze_or_none(&self, ticker: &str, verbose: bool) -> Option<ScoreResult> {
        match self.analyze(ticker).await {
            Ok(result) => Some(result),
            Err(e) => {
                if verbose {
                    warn!(
                        ticker,
                        kind = e.kind(),
                        "QuantumAnalyzer: {} skipped: {}",
                        ticker,
                        e
                    );
                } else {
                    debug!(
                        ticker,
                        kind = e.kind(),
                        "QuantumAnalyzer: {} skipped: {}",
                        ticker,
                        e
                    );
                }
                None
            }
        }
    }

    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, AnalysisError> {
        let series = self
            .market_service
            .get_history(
                symbol,
                &self.config.history_period,
                &self.config.history_interval,
            )
            .await
            .map_err(|e| AnalysisError::DataUnavailable {
                ticker: symbol.to_string(),
                reason: format!("{:#}", e),
            })?;

        if series.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                ticker: symbol.to_string(),
                reason: "empty history".to_string(),
            });
        }
        Ok(series)
    }

    /// Missing fundamentals are not an error: fall back to the neutral consensus.
    async fn fetch_consensus(&self, ticker: &str) -> f64 {
        match self.market_service.get_fundamentals(ticker).await {
            Ok(fundamentals) => fundamentals.consensus_or(self.config.neutral_consensus),
            Err(e) => {
                debug!(ticker, "QuantumAnalyzer: fundamentals unavailable: {:#}", e);
                self.config.neutral_consensus
            }
        }
    }

    fn align_checked(
        ticker: &str,
        history: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<AlignedSeries, AnalysisError> {
        let aligned = align(history, benchmark);
        if aligned.is_empty() {
            return Err(AnalysisError::AlignmentEmpty {
                ticker: ticker.to_string(),
                benchmark: benchmark.symbol().to_string(),
            });
        }
        Ok(aligned)
    }

    /// Synchronous half of the pipeline: everything after the data is in hand.
    pub fn score_aligned(
        &self,
        ticker: &str,
        aligned: &AlignedSeries,
        analyst_consensus: f64,
    ) -> Result<ScoreResult, AnalysisError> {
        let rel_volume = relative_volume(&aligned.ticker_volume, self.config.volume_lookback);

        let rows = self.features.compute(aligned);
        let latest = FeatureEngineeringService::latest_complete(&rows)
            .and_then(|row| row.to_vector())
            .ok_or_else(|| AnalysisError::InsufficientFeatureData {
                ticker: ticker.to_string(),
            })?;

        let dataset = build_labeled_dataset(
            &rows,
            self.config.label_horizon,
            self.config.label_threshold,
        );
        if dataset.is_empty() {
            return Err(AnalysisError::InsufficientData { rows: 0 });
        }

        let model = self.trainer.train(&dataset)?;
        let probability = model.probability(&latest)?;
        let q_score = composite_score(probability, analyst_consensus, rel_volume);

        let price = aligned.last_close().unwrap_or_default();
        let result = ScoreResult {
            ticker: ticker.to_string(),
            price: price_to_cents(price),
            probability,
            accuracy: model.accuracy,
            q_score: round2(q_score),
            analyst_consensus: round2(analyst_consensus),
            relative_volume: rel_volume,
        };

        if !result.is_finite() {
            return Err(AnalysisError::ModelFailure {
                reason: format!("non-finite score output for {}", ticker),
            });
        }

        debug!(
            ticker,
            labeled_rows = dataset.len(),
            probability,
            accuracy = model.accuracy,
            q_score = result.q_score,
            "QuantumAnalyzer: scored"
        );
        Ok(result)
    }
}
