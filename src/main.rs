mod analyzer;
mod config;
mod model;
mod normalizer;
mod parser;
mod pipeline;
mod provider;
mod report;
mod roster;
mod storage;
mod utils;

use analyzer::AnalyzerImpl;
use chrono::Utc;
use config::{AppConfig, load_config};
use pipeline::{BatchSettings, run_batch};
use provider::YahooProvider;
use report::write_report;
use roster::load_roster;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    // Load configuration from file
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };
    let params = match config.validate() {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let roster = match load_roster(&config.roster_path) {
        Ok(r) => r,
        Err(e) => {
            error!("Roster load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider = match YahooProvider::new(&config.provider) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "🚀 Analysing {} tickers over {} EMA periods (tolerance {}, window {}, long term >= {})",
        roster.len(),
        params.ema_periods().len(),
        params.tolerance,
        params.rolling_window,
        params.long_term_min_period
    );

    let analyzer = AnalyzerImpl::new(params);
    let settings = BatchSettings {
        price_window: config.price_window.clone(),
        volume_window: config.volume_window.clone(),
        volume_threshold: config.volume_threshold,
    };

    let summary = run_batch(&roster, &provider, &analyzer, &settings).await;

    if let Err(e) = write_report(&summary.rows, &config.output, Utc::now()) {
        error!("Failed to write report {}: {}", config.output.path.display(), e);
        return ExitCode::FAILURE;
    }

    if !summary.diagnostics.is_empty() {
        info!("Skipped tickers:");
        for d in &summary.diagnostics {
            info!("  {} ({}): {}", d.ticker, d.name, d.message);
        }
    }

    if summary.rows.is_empty() {
        warn!(
            "No ticker could be analysed; {} contains an empty report.",
            config.output.path.display()
        );
    } else {
        info!(
            "✅ Analysis finished. {} rows written to {}",
            summary.rows.len(),
            config.output.path.display()
        );
    }

    ExitCode::SUCCESS
}
