//! Daily price history and date alignment.
//!
//! A `PriceSeries` is one instrument's daily bars keyed by timezone-naive
//! calendar dates. Two series are combined with `align`, which keeps only the
//! dates present in both (inner join).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Ordered daily bars, strictly increasing dates, no duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from unordered bars.
    ///
    /// Bars are sorted by date; for duplicate dates the last one supplied wins.
    /// Bars without a finite close are dropped and non-finite volumes become 0.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.retain(|b| b.close.is_finite());
        for bar in bars.iter_mut() {
            if !bar.volume.is_finite() {
                bar.volume = 0.0;
            }
        }
        // Stable sort keeps the supply order among equal dates
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Ticker and benchmark restricted to their common dates.
///
/// All vectors share one index: position `i` of every field refers to
/// `dates[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    pub dates: Vec<NaiveDate>,
    pub ticker_close: Vec<f64>,
    pub ticker_volume: Vec<f64>,
    pub benchmark_close: Vec<f64>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.ticker_close.last().copied()
    }
}

/// Inner-join two series on date.
///
/// Both inputs are sorted and duplicate-free by construction, so a single
/// merge pass suffices.
pub fn align(ticker: &PriceSeries, benchmark: &PriceSeries) -> AlignedSeries {
    let mut aligned = AlignedSeries::default();
    let (a, b) = (ticker.bars(), benchmark.bars());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                aligned.dates.push(a[i].date);
                aligned.ticker_close.push(a[i].close);
                aligned.ticker_volume.push(a[i].volume);
                aligned.benchmark_close.push(b[j].close);
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}
