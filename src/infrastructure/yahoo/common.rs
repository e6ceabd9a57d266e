//! Yahoo Finance wire types and response parsing.
//!
//! Kept free of I/O so the conversions can be tested against captured payloads.

use crate::domain::market::{Fundamentals, PriceBar, PriceSeries};
use anyhow::{Context, Result, anyhow};
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct YahooError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

// v8 chart

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: String,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

// v10 quoteSummary

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryBody {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryResult {
    #[serde(rename = "financialData", default)]
    pub financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
pub struct FinancialData {
    #[serde(rename = "recommendationMean", default)]
    pub recommendation_mean: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
pub struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

/// Convert a chart payload into a daily series.
///
/// Timestamps are shifted into exchange-local time before truncating to a
/// calendar date. Bars with a null close are dropped; null volume becomes 0.
pub fn parse_chart(ticker: &str, response: ChartResponse) -> Result<PriceSeries> {
    if let Some(error) = response.chart.error {
        return Err(anyhow!(
            "Yahoo chart error for {}: {} ({})",
            ticker,
            error.description,
            error.code
        ));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(ticker));
    };

    let offset = result.meta.gmtoffset;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = quote.close.get(i).copied().flatten()?;
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PriceBar::new(date, close, volume))
        })
        .collect();

    Ok(PriceSeries::new(ticker, bars))
}

pub fn parse_fundamentals(ticker: &str, response: QuoteSummaryResponse) -> Result<Fundamentals> {
    if let Some(error) = response.quote_summary.error {
        return Err(anyhow!(
            "Yahoo quoteSummary error for {}: {} ({})",
            ticker,
            error.description,
            error.code
        ));
    }

    let recommendation_mean = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.financial_data)
        .and_then(|f| f.recommendation_mean)
        .and_then(|v| v.raw);

    Ok(Fundamentals {
        recommendation_mean,
    })
}

/// Yahoo writes share classes with a dash (`BRK.B` -> `BRK-B`).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().replace('.', "-")
}

/// Symbols from an S&P 500 constituents CSV with a `Symbol` column.
pub fn parse_constituents_csv(text: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .context("Failed to read constituents CSV header")?;
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("symbol"))
        .ok_or_else(|| anyhow!("Constituents CSV has no Symbol column"))?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read constituents CSV row")?;
        if let Some(symbol) = record.get(column) {
            let symbol = normalize_symbol(symbol);
            if !symbol.is_empty() {
                symbols.push(symbol);
            }
        }
    }
    Ok(symbols)
}
