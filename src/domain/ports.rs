use crate::domain::market::{Fundamentals, Market, PriceSeries};
use anyhow::Result;
use async_trait::async_trait;

/// External market-data collaborator.
///
/// Implementations may return an empty series for unknown tickers or during a
/// provider outage; the analyzer treats errors and empty results alike.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Daily OHLCV history, e.g. `period = "2y"`, `interval = "1d"`.
    async fn get_history(&self, ticker: &str, period: &str, interval: &str) -> Result<PriceSeries>;

    async fn get_fundamentals(&self, ticker: &str) -> Result<Fundamentals>;

    /// Candidate tickers for a market, in provider order.
    async fn get_universe(&self, market: Market) -> Result<Vec<String>>;
}
