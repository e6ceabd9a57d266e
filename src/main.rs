use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qscore::application::analyzer::QuantumAnalyzer;
use qscore::application::scanner::{ScannerConfig, UniverseScanner};
use qscore::config::Config;
use qscore::domain::market::Market;
use qscore::domain::scoring::ScoreResult;
use qscore::infrastructure::ServiceFactory;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Quantitative quality score for equities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single ticker
    Analyze {
        /// Ticker symbol, e.g. NVDA or WALMEX.MX
        ticker: String,

        /// Log every pipeline stage (debug level) unless RUST_LOG is set
        #[arg(short, long)]
        verbose: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sample a market universe and rank the tickers that score
    Scan {
        /// MEX (BMV) or US (S&P 500)
        #[arg(short, long, default_value = "MEX")]
        market: String,

        /// Number of tickers to sample (overrides SCAN_SAMPLE_SIZE)
        #[arg(short, long)]
        sample: Option<usize>,

        /// Sampling seed (overrides SCAN_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_table(results: &[ScoreResult]) {
    println!(
        "{:<14} {:>10} {:>8} {:>7} {:>7} {:>9} {:>7}",
        "TICKER", "PRICE", "Q-SCORE", "PROB", "ACC", "CONSENSUS", "REL VOL"
    );
    for r in results {
        println!(
            "{:<14} {:>10} {:>8.2} {:>6.1}% {:>6.1}% {:>9.2} {:>6.2}x",
            r.ticker,
            r.price,
            r.q_score,
            r.probability * 100.0,
            r.accuracy * 100.0,
            r.analyst_consensus,
            r.relative_volume
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let default_level = if matches!(cli.command, Commands::Analyze { verbose: true, .. }) {
        "debug"
    } else {
        "info"
    };

    // Logs go to stderr so JSON output stays clean
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let market_service = ServiceFactory::create_market_data_service(&config)?;
    let analyzer = Arc::new(QuantumAnalyzer::from_config(market_service.clone(), &config));

    match cli.command {
        Commands::Analyze { ticker, json, .. } => {
            let ticker = ticker.trim().to_uppercase();
            info!("Analyzing {} against {}", ticker, config.benchmark_symbol);

            let result = analyzer
                .analyze(&ticker)
                .await
                .with_context(|| format!("Could not score {}", ticker))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_table(std::slice::from_ref(&result));
            }
        }
        Commands::Scan {
            market,
            sample,
            seed,
            json,
        } => {
            let market = Market::from_str(&market)?;
            let mut scanner_config = ScannerConfig::from(&config);
            if let Some(sample) = sample {
                scanner_config.sample_size = sample;
            }
            if seed.is_some() {
                scanner_config.seed = seed;
            }

            let scanner = UniverseScanner::new(market_service, analyzer, scanner_config);
            let results = scanner.scan(market).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No ticker in the {} sample could be scored", market);
            } else {
                print_table(&results);
            }
        }
    }

    Ok(())
}
