use crate::config::{Config, ProviderKind};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const ALL_KEYS: &[&str] = &[
    "MARKET_DATA_PROVIDER",
    "YAHOO_BASE_URL",
    "SP500_CONSTITUENTS_URL",
    "HTTP_MAX_RETRIES",
    "BENCHMARK_SYMBOL",
    "HISTORY_PERIOD",
    "HISTORY_INTERVAL",
    "ZSCORE_WINDOW",
    "RS_LAG",
    "VOLATILITY_WINDOW",
    "VOLUME_LOOKBACK",
    "LABEL_HORIZON",
    "LABEL_THRESHOLD",
    "NEUTRAL_CONSENSUS",
    "MODEL_TREES",
    "MODEL_MAX_DEPTH",
    "MODEL_MIN_SPLIT",
    "MODEL_TRAIN_FRACTION",
    "MODEL_SEED",
    "SCAN_SAMPLE_SIZE",
    "SCAN_SEED",
    "SCAN_CONCURRENCY",
];

fn clear_env() {
    for key in ALL_KEYS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_config_from_env_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    let config = Config::from_env().expect("Should parse with defaults");
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    unsafe {
        env::set_var("MARKET_DATA_PROVIDER", "mock");
        env::set_var("BENCHMARK_SYMBOL", "^MXX");
        env::set_var("ZSCORE_WINDOW", "30");
        env::set_var("LABEL_THRESHOLD", "0.03");
        env::set_var("MODEL_TREES", "25");
        env::set_var("MODEL_SEED", "7");
        env::set_var("SCAN_SEED", "1234");
        env::set_var("SCAN_CONCURRENCY", "4");
        env::set_var("YAHOO_BASE_URL", "http://localhost:8080/");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.provider, ProviderKind::Mock);
    assert_eq!(config.benchmark_symbol, "^MXX");
    assert_eq!(config.zscore_window, 30);
    assert!((config.label_threshold - 0.03).abs() < 1e-12);
    assert_eq!(config.model_trees, 25);
    assert_eq!(config.model_seed, 7);
    assert_eq!(config.scan_seed, Some(1234));
    assert_eq!(config.scan_concurrency, 4);
    assert_eq!(config.yahoo_base_url, "http://localhost:8080");

    clear_env();
}

#[test]
fn test_config_rejects_malformed_values() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    unsafe { env::set_var("ZSCORE_WINDOW", "twenty") };
    let err = Config::from_env().unwrap_err();
    assert!(format!("{:#}", err).contains("ZSCORE_WINDOW"));
    clear_env();

    unsafe { env::set_var("MARKET_DATA_PROVIDER", "bloomberg") };
    assert!(Config::from_env().is_err());
    clear_env();

    unsafe { env::set_var("MODEL_TRAIN_FRACTION", "1.5") };
    assert!(Config::from_env().is_err());
    clear_env();

    unsafe { env::set_var("SCAN_SEED", "abc") };
    assert!(Config::from_env().is_err());
    clear_env();
}

#[test]
fn test_config_blank_seed_is_random() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    unsafe { env::set_var("SCAN_SEED", "  ") };
    let config = Config::from_env().unwrap();
    assert_eq!(config.scan_seed, None);

    clear_env();
}
