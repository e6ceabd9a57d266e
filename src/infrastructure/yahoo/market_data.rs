//! Yahoo Finance Market Data Service
//!
//! Provides:
//! - Daily history (v8 chart endpoint)
//! - Analyst consensus (v10 quoteSummary, `financialData` module)
//! - S&P 500 constituents for the US universe

use super::common::{
    ChartResponse, QuoteSummaryResponse, parse_chart, parse_constituents_csv, parse_fundamentals,
};
use crate::config::{Config, DEFAULT_SP500_CONSTITUENTS_URL, DEFAULT_YAHOO_BASE_URL};
use crate::domain::market::{Fundamentals, Market, PriceSeries};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, HttpClientSettings, build_url_with_query, encode_component,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

pub struct YahooMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
    constituents_url: String,
}

impl YahooMarketDataService {
    pub fn builder() -> YahooMarketDataServiceBuilder {
        YahooMarketDataServiceBuilder::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .base_url(config.yahoo_base_url.clone())
            .constituents_url(config.sp500_constituents_url.clone())
            .max_retries(config.http_max_retries)
            .build()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context(format!("Failed to fetch {} from Yahoo", what))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context(format!("Failed to read Yahoo {} response", what))?;

        // Yahoo reports unknown symbols as 404 with an error body, which parses below
        if !status.is_success() && status.as_u16() != 404 {
            anyhow::bail!("Yahoo {} fetch failed ({}): {}", what, status, text);
        }

        serde_json::from_str(&text).context(format!("Failed to parse Yahoo {} response", what))
    }

    async fn fetch_constituents(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.constituents_url)
            .send()
            .await
            .context("Failed to fetch S&P 500 constituents")?;

        if !response.status().is_success() {
            anyhow::bail!("S&P 500 constituents fetch failed: {}", response.status());
        }

        let text = response
            .text()
            .await
            .context("Failed to read S&P 500 constituents")?;
        parse_constituents_csv(&text)
    }
}

#[derive(Default)]
pub struct YahooMarketDataServiceBuilder {
    base_url: Option<String>,
    constituents_url: Option<String>,
    max_retries: Option<u32>,
}

impl YahooMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn constituents_url(mut self, url: String) -> Self {
        self.constituents_url = Some(url);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn build(self) -> Result<YahooMarketDataService> {
        let mut settings = HttpClientSettings::default();
        if let Some(max_retries) = self.max_retries {
            settings.max_retries = max_retries;
        }

        Ok(YahooMarketDataService {
            client: HttpClientFactory::create_client(&settings)?,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            constituents_url: self
                .constituents_url
                .unwrap_or_else(|| DEFAULT_SP500_CONSTITUENTS_URL.to_string()),
        })
    }
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn get_history(&self, ticker: &str, period: &str, interval: &str) -> Result<PriceSeries> {
        let url = build_url_with_query(
            &format!(
                "{}/v8/finance/chart/{}",
                self.base_url,
                encode_component(ticker)
            ),
            &[("range", period), ("interval", interval)],
        );

        let response: ChartResponse = self.get_json(&url, "chart").await?;
        let series = parse_chart(ticker, response)?;
        debug!(
            "YahooMarketDataService: Fetched {} bars for {}",
            series.len(),
            ticker
        );
        Ok(series)
    }

    async fn get_fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let url = build_url_with_query(
            &format!(
                "{}/v10/finance/quoteSummary/{}",
                self.base_url,
                encode_component(ticker)
            ),
            &[("modules", "financialData")],
        );

        let response: QuoteSummaryResponse = self.get_json(&url, "quoteSummary").await?;
        parse_fundamentals(ticker, response)
    }

    async fn get_universe(&self, market: Market) -> Result<Vec<String>> {
        if market.is_static() {
            return Ok(market.fallback_universe());
        }

        match self.fetch_constituents().await {
            Ok(symbols) if !symbols.is_empty() => {
                info!(
                    "YahooMarketDataService: Loaded {} S&P 500 constituents",
                    symbols.len()
                );
                Ok(symbols)
            }
            Ok(_) => {
                warn!("YahooMarketDataService: Constituents list empty, using fallback");
                Ok(market.fallback_universe())
            }
            Err(e) => {
                warn!(
                    "YahooMarketDataService: Constituents fetch failed ({:#}), using fallback",
                    e
                );
                Ok(market.fallback_universe())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let service = YahooMarketDataService::builder().build().unwrap();
        assert_eq!(service.base_url, DEFAULT_YAHOO_BASE_URL);
        assert_eq!(service.constituents_url, DEFAULT_SP500_CONSTITUENTS_URL);
    }

    #[test]
    fn test_builder_trims_base_url() {
        let service = YahooMarketDataService::builder()
            .base_url("http://localhost:9000/".to_string())
            .max_retries(0)
            .build()
            .unwrap();
        assert_eq!(service.base_url, "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_mex_universe_is_static() {
        let service = YahooMarketDataService::builder().build().unwrap();
        let universe = service.get_universe(Market::Mex).await.unwrap();
        assert_eq!(universe, Market::Mex.fallback_universe());
    }
}
