// Per-ticker processing and batch aggregation
use crate::analyzer::{Analyzer, AnalyzerImpl, EmaFit};
use crate::config::DataWindow;
use crate::model::{AnalysisError, HistoryRequest, TickerEntry};
use crate::provider::PriceProvider;
use crate::report::ReportRow;
use tracing::{info, warn};

/// Settings for one batch, besides the analyzer parameters.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub price_window: DataWindow,
    pub volume_window: DataWindow,
    pub volume_threshold: f64,
}

#[derive(Debug)]
pub enum TickerOutcome {
    Reported(ReportRow),
    Skipped {
        ticker: String,
        name: String,
        reason: AnalysisError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub ticker: String,
    pub name: String,
    pub message: String,
}

/// Report rows in roster order plus one diagnostic per skipped ticker.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub rows: Vec<ReportRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchSummary {
    fn record(&mut self, outcome: TickerOutcome) {
        match outcome {
            TickerOutcome::Reported(row) => self.rows.push(row),
            TickerOutcome::Skipped {
                ticker,
                name,
                reason,
            } => self.diagnostics.push(Diagnostic {
                ticker,
                name,
                message: reason.to_string(),
            }),
        }
    }
}

fn request(symbol: &str, window: &DataWindow) -> HistoryRequest {
    HistoryRequest {
        symbol: symbol.to_string(),
        range: window.range.clone(),
        interval: window.interval.clone(),
    }
}

fn describe(fit: Option<&EmaFit>) -> String {
    match fit {
        Some(fit) => format!("EMA {} ({} contacts)", fit.period, fit.contacts),
        None => "none".to_string(),
    }
}

/// Fetches both windows, applies the volume gate and runs the analysis.
pub async fn analyze_ticker(
    entry: &TickerEntry,
    provider: &dyn PriceProvider,
    analyzer: &AnalyzerImpl,
    settings: &BatchSettings,
) -> Result<ReportRow, AnalysisError> {
    let prices = provider
        .fetch_history(&request(&entry.symbol, &settings.price_window))
        .await?;
    let volumes = provider
        .fetch_history(&request(&entry.symbol, &settings.volume_window))
        .await?;

    if prices.is_empty() || volumes.is_empty() {
        return Err(AnalysisError::MissingData);
    }

    let average = volumes
        .average_volume()
        .ok_or(AnalysisError::UndefinedStatistic("average daily volume"))?;
    if average < settings.volume_threshold {
        return Err(AnalysisError::InsufficientVolume {
            average,
            threshold: settings.volume_threshold,
        });
    }

    let closes = prices.closes();
    let last_close = prices.last_close().ok_or(AnalysisError::MissingData)?;
    let analysis = analyzer.analyze(&closes)?;

    info!(
        "{}: {} samples, max contacts {}, long term {}",
        entry.symbol,
        prices.len(),
        describe(analysis.max_contacts.as_ref()),
        describe(analysis.long_term.as_ref())
    );

    Ok(ReportRow::build(entry, last_close, &analysis))
}

/// Processes a single ticker. Any failure becomes a `Skipped` outcome.
pub async fn process_ticker(
    entry: &TickerEntry,
    provider: &dyn PriceProvider,
    analyzer: &AnalyzerImpl,
    settings: &BatchSettings,
) -> TickerOutcome {
    info!("Analysing {} ({})...", entry.symbol, entry.name);
    match analyze_ticker(entry, provider, analyzer, settings).await {
        Ok(row) => TickerOutcome::Reported(row),
        Err(reason) => {
            warn!("⚠️ {} ({}) skipped: {}", entry.symbol, entry.name, reason);
            TickerOutcome::Skipped {
                ticker: entry.symbol.clone(),
                name: entry.name.clone(),
                reason,
            }
        }
    }
}

/// Runs the roster one ticker at a time, in order.
pub async fn run_batch(
    roster: &[TickerEntry],
    provider: &dyn PriceProvider,
    analyzer: &AnalyzerImpl,
    settings: &BatchSettings,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for entry in roster {
        let outcome = process_ticker(entry, provider, analyzer, settings).await;
        summary.record(outcome);
    }

    info!(
        "Batch finished: {} reported, {} skipped",
        summary.rows.len(),
        summary.diagnostics.len()
    );
    summary
}
