use qscore::application::analyzer::{AnalyzerConfig, QuantumAnalyzer};
use qscore::application::ml::classifier::ClassifierParams;
use qscore::application::scanner::{ScannerConfig, UniverseScanner};
use qscore::domain::market::{Fundamentals, Market};
use qscore::domain::ports::MarketDataService;
use qscore::infrastructure::mock::{MockMarketDataService, SyntheticWalk};
use std::sync::Arc;

fn universe(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Five-ticker universe where BAD1 has no data and BAD2 errors on fetch.
fn five_ticker_market() -> MockMarketDataService {
    let walk = SyntheticWalk::default();
    MockMarketDataService::new()
        .with_synthetic_history("SPY", &walk, 1)
        .with_synthetic_history("AAA", &walk, 10)
        .with_synthetic_history("BBB", &walk, 20)
        .with_synthetic_history("CCC", &walk, 30)
        .with_fundamentals("AAA", Fundamentals::with_recommendation(1.5))
        .with_fundamentals("CCC", Fundamentals::with_recommendation(4.2))
        .with_history_failure("BAD2")
        .with_universe(
            Market::Us,
            universe(&["AAA", "BAD1", "BBB", "BAD2", "CCC"]),
        )
}

fn scanner(service: MockMarketDataService, config: ScannerConfig) -> UniverseScanner {
    let service: Arc<dyn MarketDataService> = Arc::new(service);
    let analyzer = Arc::new(QuantumAnalyzer::new(
        service.clone(),
        AnalyzerConfig::default(),
        ClassifierParams::default(),
    ));
    UniverseScanner::new(service, analyzer, config)
}

#[tokio::test]
async fn test_scan_skips_failures_and_sorts_descending() {
    let scanner = scanner(
        five_ticker_market(),
        ScannerConfig {
            sample_size: 20,
            seed: Some(42),
            concurrency: 1,
        },
    );

    let results = scanner.scan(Market::Us).await;

    assert_eq!(results.len(), 3);
    let mut tickers: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
    tickers.sort();
    assert_eq!(tickers, vec!["AAA", "BBB", "CCC"]);
    for pair in results.windows(2) {
        assert!(pair[0].q_score >= pair[1].q_score);
    }
    assert!(results.iter().all(|r| r.is_finite()));
}

#[tokio::test]
async fn test_concurrent_scan_matches_sequential() {
    let sequential = scanner(
        five_ticker_market(),
        ScannerConfig {
            sample_size: 20,
            seed: Some(7),
            concurrency: 1,
        },
    )
    .scan(Market::Us)
    .await;

    let concurrent = scanner(
        five_ticker_market(),
        ScannerConfig {
            sample_size: 20,
            seed: Some(7),
            concurrency: 4,
        },
    )
    .scan(Market::Us)
    .await;

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_sample_size_limits_analyzed_tickers() {
    let service = five_ticker_market();
    let tracker = service.clone();
    let scanner = scanner(
        service,
        ScannerConfig {
            sample_size: 2,
            seed: Some(3),
            concurrency: 1,
        },
    );

    let results = scanner.scan(Market::Us).await;
    assert!(results.len() <= 2);

    // Each sampled ticker fetches its own history plus the benchmark
    assert_eq!(tracker.history_requests(), 4);
}

#[tokio::test]
async fn test_universe_failure_falls_back_to_builtin_list() {
    let service = MockMarketDataService::new().with_universe_failure(Market::Us);
    let tracker = service.clone();
    let scanner = scanner(
        service,
        ScannerConfig {
            sample_size: 3,
            seed: Some(1),
            concurrency: 2,
        },
    );

    // No histories configured: every analysis fails, the scan still completes
    let results = scanner.scan(Market::Us).await;
    assert!(results.is_empty());
    assert_eq!(tracker.history_requests(), 6);

    let fallback = Market::Us.fallback_universe();
    let sampled: usize = fallback
        .iter()
        .map(|t| tracker.history_requests_for(t))
        .sum();
    assert_eq!(sampled, 3);
}
