use crate::domain::market::{Fundamentals, Market, PriceBar, PriceSeries};
use crate::domain::ports::MarketDataService;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Parameters of a seeded geometric random walk over weekdays.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticWalk {
    pub start: NaiveDate,
    pub days: usize,
    pub start_price: f64,
    /// Mean daily log return
    pub drift: f64,
    /// Half-width of the uniform daily log-return shock
    pub volatility: f64,
    pub base_volume: f64,
}

impl Default for SyntheticWalk {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            days: 504,
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.03,
            base_volume: 1_000_000.0,
        }
    }
}

impl SyntheticWalk {
    /// Same `seed` always yields the same series.
    pub fn generate(&self, symbol: &str, seed: u64) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bars = Vec::with_capacity(self.days);
        let mut date = self.start;
        let mut price = self.start_price;

        while bars.len() < self.days {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let shock = (rng.random::<f64>() * 2.0 - 1.0) * self.volatility;
                price *= (self.drift + shock).exp();
                let volume = self.base_volume * (0.5 + rng.random::<f64>());
                bars.push(PriceBar::new(date, price, volume.round()));
            }
            date += Duration::days(1);
        }

        PriceSeries::new(symbol, bars)
    }
}

/// Stable per-symbol seed (FNV-1a) so demo data does not change between runs.
pub fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// In-memory market data for tests and offline runs.
///
/// Unknown tickers return an empty series, like an upstream provider would.
#[derive(Clone, Default)]
pub struct MockMarketDataService {
    histories: HashMap<String, PriceSeries>,
    fundamentals: HashMap<String, Fundamentals>,
    universes: HashMap<Market, Vec<String>>,
    failing_history: HashSet<String>,
    failing_fundamentals: HashSet<String>,
    failing_universes: HashSet<Market>,
    history_requests: Arc<AtomicUsize>,
    requests_by_symbol: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthetic data for the benchmark, both built-in universes and their
    /// fundamentals. Used by the `mock` provider.
    pub fn demo(benchmark: &str) -> Self {
        let walk = SyntheticWalk::default();
        let benchmark_history = walk.generate(benchmark, symbol_seed(benchmark));
        let mut service = Self::new().with_history(benchmark_history);

        for market in [Market::Mex, Market::Us] {
            let universe = market.fallback_universe();
            for ticker in &universe {
                let seed = symbol_seed(ticker);
                let ticker_walk = SyntheticWalk {
                    start_price: 20.0 + (seed % 400) as f64,
                    drift: ((seed % 7) as f64 - 3.0) * 0.0004,
                    ..walk.clone()
                };
                let consensus = 1.0 + (seed % 40) as f64 / 10.0;
                service = service
                    .with_history(ticker_walk.generate(ticker, seed))
                    .with_fundamentals(ticker, Fundamentals::with_recommendation(consensus));
            }
            service = service.with_universe(market, universe);
        }

        info!(
            "MockMarketDataService: Demo data for {} symbols",
            service.histories.len()
        );
        service
    }

    pub fn with_history(mut self, series: PriceSeries) -> Self {
        self.histories.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_synthetic_history(self, symbol: &str, walk: &SyntheticWalk, seed: u64) -> Self {
        self.with_history(walk.generate(symbol, seed))
    }

    pub fn with_fundamentals(mut self, symbol: &str, fundamentals: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.to_string(), fundamentals);
        self
    }

    pub fn with_universe(mut self, market: Market, tickers: Vec<String>) -> Self {
        self.universes.insert(market, tickers);
        self
    }

    /// History requests for `symbol` fail with an error.
    pub fn with_history_failure(mut self, symbol: &str) -> Self {
        self.failing_history.insert(symbol.to_string());
        self
    }

    pub fn with_fundamentals_failure(mut self, symbol: &str) -> Self {
        self.failing_fundamentals.insert(symbol.to_string());
        self
    }

    pub fn with_universe_failure(mut self, market: Market) -> Self {
        self.failing_universes.insert(market);
        self
    }

    /// Total `get_history` calls across all clones.
    pub fn history_requests(&self) -> usize {
        self.history_requests.load(Ordering::SeqCst)
    }

    pub fn history_requests_for(&self, symbol: &str) -> usize {
        self.requests_by_symbol
            .lock()
            .map(|counts| counts.get(symbol).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_history(
        &self,
        ticker: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<PriceSeries> {
        self.history_requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut counts) = self.requests_by_symbol.lock() {
            *counts.entry(ticker.to_string()).or_insert(0) += 1;
        }

        if self.failing_history.contains(ticker) {
            anyhow::bail!("MockMarketDataService: simulated outage for {}", ticker);
        }
        Ok(self
            .histories
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(ticker)))
    }

    async fn get_fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        if self.failing_fundamentals.contains(ticker) {
            anyhow::bail!(
                "MockMarketDataService: fundamentals unavailable for {}",
                ticker
            );
        }
        Ok(self.fundamentals.get(ticker).copied().unwrap_or_default())
    }

    async fn get_universe(&self, market: Market) -> Result<Vec<String>> {
        if self.failing_universes.contains(&market) {
            anyhow::bail!("MockMarketDataService: universe unavailable for {}", market);
        }
        Ok(self.universes.get(&market).cloned().unwrap_or_default())
    }
}
