use chrono::{Datelike, Duration, NaiveDate, Weekday};
use qscore::application::analyzer::{AnalyzerConfig, QuantumAnalyzer};
use qscore::application::ml::classifier::ClassifierParams;
use qscore::domain::errors::AnalysisError;
use qscore::domain::market::{Fundamentals, PriceBar, PriceSeries};
use qscore::domain::scoring::composite_score;
use qscore::infrastructure::mock::{MockMarketDataService, SyntheticWalk};
use rust_decimal::Decimal;
use std::sync::Arc;

fn weekdays(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut date = start;
    while dates.len() < count {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date += Duration::days(1);
    }
    dates
}

fn flat_series(symbol: &str, start: NaiveDate, days: usize, price: f64) -> PriceSeries {
    let bars = weekdays(start, days)
        .into_iter()
        .map(|d| PriceBar::new(d, price, 1_000.0))
        .collect();
    PriceSeries::new(symbol, bars)
}

fn analyzer(service: MockMarketDataService) -> QuantumAnalyzer {
    QuantumAnalyzer::new(
        Arc::new(service),
        AnalyzerConfig::default(),
        ClassifierParams::default(),
    )
}

fn market_with(ticker: &str, seed: u64) -> MockMarketDataService {
    let walk = SyntheticWalk::default();
    MockMarketDataService::new()
        .with_synthetic_history("SPY", &walk, 1)
        .with_synthetic_history(ticker, &walk, seed)
}

#[tokio::test]
async fn test_no_common_dates_is_alignment_empty() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 6).unwrap();
    let ticker = SyntheticWalk {
        start,
        days: 100,
        ..SyntheticWalk::default()
    }
    .generate("AAA", 3);
    let benchmark = SyntheticWalk {
        start: start + Duration::days(400),
        days: 100,
        ..SyntheticWalk::default()
    }
    .generate("SPY", 4);

    let service = MockMarketDataService::new()
        .with_history(ticker)
        .with_history(benchmark);
    let analyzer = analyzer(service);

    let err = analyzer.analyze("AAA").await.unwrap_err();
    assert_eq!(
        err,
        AnalysisError::AlignmentEmpty {
            ticker: "AAA".to_string(),
            benchmark: "SPY".to_string()
        }
    );
    assert!(analyzer.analyze_or_none("AAA", false).await.is_none());
}

#[tokio::test]
async fn test_constant_price_is_insufficient_feature_data() {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let service = MockMarketDataService::new()
        .with_history(flat_series("FLAT", start, 250, 42.0))
        .with_synthetic_history(
            "SPY",
            &SyntheticWalk {
                start,
                days: 250,
                ..SyntheticWalk::default()
            },
            1,
        );
    let analyzer = analyzer(service);

    let err = analyzer.analyze("FLAT").await.unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientFeatureData {
            ticker: "FLAT".to_string()
        }
    );
    assert!(analyzer.analyze_or_none("FLAT", true).await.is_none());
}

#[tokio::test]
async fn test_unknown_ticker_is_data_unavailable() {
    let analyzer = analyzer(market_with("AAA", 7));
    let err = analyzer.analyze("NOPE").await.unwrap_err();
    assert!(matches!(err, AnalysisError::DataUnavailable { ref ticker, .. } if ticker == "NOPE"));
}

#[tokio::test]
async fn test_benchmark_failure_names_benchmark() {
    let walk = SyntheticWalk::default();
    let service = MockMarketDataService::new()
        .with_synthetic_history("AAA", &walk, 7)
        .with_history_failure("SPY");
    let err = analyzer(service).analyze("AAA").await.unwrap_err();
    assert!(matches!(err, AnalysisError::DataUnavailable { ref ticker, .. } if ticker == "SPY"));
}

#[tokio::test]
async fn test_successful_analysis_is_consistent() {
    let service =
        market_with("AAA", 11).with_fundamentals("AAA", Fundamentals::with_recommendation(1.75));
    let analyzer = analyzer(service);

    let result = analyzer.analyze("AAA").await.unwrap();

    assert_eq!(result.ticker, "AAA");
    assert!(result.is_finite());
    assert!((0.0..=1.0).contains(&result.probability));
    assert!((0.0..=1.0).contains(&result.accuracy));
    assert!(result.relative_volume >= 0.0);
    assert_eq!(result.analyst_consensus, 1.75);
    assert!(result.price > Decimal::ZERO);
    assert!(result.price.scale() <= 2);

    let expected = composite_score(
        result.probability,
        result.analyst_consensus,
        result.relative_volume,
    );
    assert!((result.q_score - expected).abs() <= 0.005 + 1e-9);
}

#[tokio::test]
async fn test_missing_fundamentals_use_neutral_consensus() {
    let analyzer_a = analyzer(market_with("AAA", 11));
    let result = analyzer_a.analyze("AAA").await.unwrap();
    assert_eq!(result.analyst_consensus, 3.0);

    let analyzer_b = analyzer(market_with("AAA", 11).with_fundamentals_failure("AAA"));
    let result_b = analyzer_b.analyze("AAA").await.unwrap();
    assert_eq!(result_b.analyst_consensus, 3.0);
    assert_eq!(result, result_b);
}

#[tokio::test]
async fn test_zero_volume_history_has_zero_relative_volume() {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let walk = SyntheticWalk {
        start,
        base_volume: 0.0,
        ..SyntheticWalk::default()
    };
    let service = MockMarketDataService::new()
        .with_synthetic_history("SPY", &SyntheticWalk::default(), 1)
        .with_synthetic_history("QUIET", &walk, 5);

    let result = analyzer(service).analyze("QUIET").await.unwrap();
    assert_eq!(result.relative_volume, 0.0);
}

#[tokio::test]
async fn test_analysis_is_deterministic_for_seed() {
    let analyzer = analyzer(market_with("AAA", 21));
    let first = analyzer.analyze("AAA").await.unwrap();
    let second = analyzer.analyze("AAA").await.unwrap();

    assert_eq!(first.probability, second.probability);
    assert_eq!(first.accuracy, second.accuracy);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_every_call_refetches_history() {
    let service = market_with("AAA", 21);
    let tracker = service.clone();
    let analyzer = analyzer(service);

    analyzer.analyze("AAA").await.unwrap();
    analyzer.analyze("AAA").await.unwrap();

    assert_eq!(tracker.history_requests_for("AAA"), 2);
    assert_eq!(tracker.history_requests_for("SPY"), 2);
}

#[tokio::test]
async fn test_custom_benchmark_is_used() {
    let walk = SyntheticWalk::default();
    let service = MockMarketDataService::new()
        .with_synthetic_history("^MXX", &walk, 2)
        .with_synthetic_history("WALMEX.MX", &walk, 3);
    let tracker = service.clone();
    let config = AnalyzerConfig {
        benchmark_symbol: "^MXX".to_string(),
        ..AnalyzerConfig::default()
    };
    let analyzer = QuantumAnalyzer::new(Arc::new(service), config, ClassifierParams::default());

    assert!(analyzer.analyze("WALMEX.MX").await.is_ok());
    assert_eq!(tracker.history_requests_for("^MXX"), 1);
    assert_eq!(tracker.history_requests_for("SPY"), 0);
}
