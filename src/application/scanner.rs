use crate::application::analyzer::QuantumAnalyzer;
use crate::config::Config;
use crate::domain::market::Market;
use crate::domain::ports::MarketDataService;
use crate::domain::scoring::ScoreResult;
use futures::future;
use futures::stream::{self, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    pub sample_size: usize,
    pub seed: Option<u64>,
    /// Tickers analyzed at once; 1 is strictly sequential.
    ///
    /// Only the market-data fetches overlap. Training and inference run
    /// inline on the task polling the stream, so model fits still happen one
    /// at a time.
    pub concurrency: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            sample_size: 20,
            seed: None,
            concurrency: 1,
        }
    }
}

impl From<&Config> for ScannerConfig {
    fn from(config: &Config) -> Self {
        Self {
            sample_size: config.scan_sample_size,
            seed: config.scan_seed,
            concurrency: config.scan_concurrency,
        }
    }
}

/// Samples a market's universe and ranks the tickers that score successfully.
pub struct UniverseScanner {
    market_service: Arc<dyn MarketDataService>,
    analyzer: Arc<QuantumAnalyzer>,
    config: ScannerConfig,
}

impl UniverseScanner {
    pub fn new(
        market_service: Arc<dyn MarketDataService>,
        analyzer: Arc<QuantumAnalyzer>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            market_service,
            analyzer,
            config,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Candidate tickers for `market`, deduplicated in provider order.
    ///
    /// A failed or empty discovery falls back to the market's built-in list.
    pub async fn universe(&self, market: Market) -> Vec<String> {
        let tickers = match self.market_service.get_universe(market).await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                warn!(%market, "UniverseScanner: empty universe, using fallback list");
                market.fallback_universe()
            }
            Err(e) => {
                warn!(
                    %market,
                    "UniverseScanner: universe fetch failed ({:#}), using fallback list",
                    e
                );
                market.fallback_universe()
            }
        };

        let mut seen = HashSet::new();
        tickers
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Uniform sample without replacement of `min(len, sample_size)` tickers.
    pub fn sample(universe: &[String], sample_size: usize, seed: Option<u64>) -> Vec<String> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        universe
            .choose_multiple(&mut rng, sample_size.min(universe.len()))
            .cloned()
            .collect()
    }

    pub async fn scan(&self, market: Market) -> Vec<ScoreResult> {
        let universe = self.universe(market).await;
        let sample = Self::sample(&universe, self.config.sample_size, self.config.seed);
        info!(
            %market,
            universe = universe.len(),
            sample = sample.len(),
            "UniverseScanner: scanning {} tickers",
            sample.len()
        );

        let results = self.scan_tickers(&sample).await;
        info!(
            %market,
            scored = results.len(),
            skipped = sample.len() - results.len(),
            "UniverseScanner: scan complete"
        );
        results
    }

    /// Analyze every ticker silently; failures are dropped, never propagated.
    pub async fn scan_tickers(&self, tickers: &[String]) -> Vec<ScoreResult> {
        let analyzer = &self.analyzer;
        let results: Vec<ScoreResult> = stream::iter(tickers)
            .map(|ticker| analyzer.analyze_or_none(ticker, false))
            .buffer_unordered(self.config.concurrency.max(1))
            .filter_map(future::ready)
            .collect()
            .await;

        rank_results(results)
    }
}

/// Descending composite score; equal scores ordered by ticker.
pub fn rank_results(mut results: Vec<ScoreResult>) -> Vec<ScoreResult> {
    results.sort_by(|a, b| {
        b.q_score
            .total_cmp(&a.q_score)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    results
}
