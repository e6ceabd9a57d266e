use crate::application::market_data::statistical_features::{
    calculate_relative_strength_series, calculate_volatility_series, calculate_zscore_series,
};
use crate::config::Config;
use crate::domain::market::AlignedSeries;
use crate::domain::scoring::FeatureRow;

/// Window lengths for the three model features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureParams {
    pub zscore_window: usize,
    pub rs_lag: usize,
    pub volatility_window: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            zscore_window: 20,
            rs_lag: 5,
            volatility_window: 10,
        }
    }
}

impl From<&Config> for FeatureParams {
    fn from(config: &Config) -> Self {
        Self {
            zscore_window: config.zscore_window,
            rs_lag: config.rs_lag,
            volatility_window: config.volatility_window,
        }
    }
}

/// Turns an aligned ticker/benchmark series into one `FeatureRow` per date.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngineeringService {
    params: FeatureParams,
}

impl FeatureEngineeringService {
    pub fn new(params: FeatureParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> FeatureParams {
        self.params
    }

    /// Rows whose trailing windows are not filled carry `None` features.
    ///
    /// One row per date that has a ticker close. A shorter benchmark leaves
    /// the relative strength undefined past its end.
    pub fn compute(&self, aligned: &AlignedSeries) -> Vec<FeatureRow> {
        let closes = &aligned.ticker_close;
        let z_scores = calculate_zscore_series(closes, self.params.zscore_window);
        let strengths = calculate_relative_strength_series(
            closes,
            &aligned.benchmark_close,
            self.params.rs_lag,
        );
        let volatilities = calculate_volatility_series(closes, self.params.volatility_window);

        aligned
            .dates
            .iter()
            .zip(closes)
            .zip(z_scores.into_iter().zip(volatilities))
            .enumerate()
            .map(|(i, ((&date, &close), (z_score, volatility)))| FeatureRow {
                date,
                close,
                z_score,
                relative_strength: strengths.get(i).copied().flatten(),
                volatility,
            })
            .collect()
    }

    /// Most recent row with every feature defined.
    pub fn latest_complete(rows: &[FeatureRow]) -> Option<&FeatureRow> {
        rows.iter().rev().find(|row| row.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn aligned(len: usize) -> AlignedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut series = AlignedSeries::default();
        for i in 0..len {
            series.dates.push(start + Duration::days(i as i64));
            series
                .ticker_close
                .push(50.0 + (i as f64 * 0.45).sin() * 3.0 + i as f64 * 0.05);
            series.ticker_volume.push(1_000.0);
            series
                .benchmark_close
                .push(400.0 + (i as f64 * 0.3).cos() * 4.0);
        }
        series
    }

    #[test]
    fn test_compute_emits_one_row_per_date() {
        let service = FeatureEngineeringService::default();
        let rows = service.compute(&aligned(60));

        assert_eq!(rows.len(), 60);
        assert!(rows[..19].iter().all(|r| !r.is_complete()));
        assert!(rows[19..].iter().all(|r| r.is_complete()));
    }

    #[test]
    fn test_first_complete_row_follows_longest_window() {
        let service = FeatureEngineeringService::new(FeatureParams {
            zscore_window: 5,
            rs_lag: 3,
            volatility_window: 12,
        });
        let rows = service.compute(&aligned(30));
        let first = rows.iter().position(|r| r.is_complete());
        assert_eq!(first, Some(12));
    }

    #[test]
    fn test_compute_tolerates_ragged_series() {
        let service = FeatureEngineeringService::default();
        let mut series = aligned(40);
        series.ticker_close.truncate(35);
        series.benchmark_close.truncate(30);

        let rows = service.compute(&series);
        assert_eq!(rows.len(), 35);
        assert!(rows[29].is_complete());
        assert_eq!(rows[30].relative_strength, None);
        assert!(rows[30..].iter().all(|r| r.z_score.is_some()));
    }

    #[test]
    fn test_latest_complete_row() {
        let service = FeatureEngineeringService::default();
        let rows = service.compute(&aligned(40));
        let latest = FeatureEngineeringService::latest_complete(&rows).unwrap();
        assert_eq!(latest.date, rows[39].date);

        let short = service.compute(&aligned(10));
        assert!(FeatureEngineeringService::latest_complete(&short).is_none());
    }

    #[test]
    fn test_features_ignore_future_prices() {
        let service = FeatureEngineeringService::default();
        let base = aligned(50);
        let mut altered = base.clone();
        altered.ticker_close[49] *= 1.5;
        altered.benchmark_close[49] *= 0.7;

        let rows_a = service.compute(&base);
        let rows_b = service.compute(&altered);
        assert_eq!(rows_a[..49], rows_b[..49]);
    }
}
