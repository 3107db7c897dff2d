// Core structs: PriceSample, PriceSeries, TickerEntry and the error enums
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Chronologically ordered samples for one ticker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub samples: Vec<PriceSample>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, samples: Vec<PriceSample>) -> Self {
        Self {
            symbol: symbol.into(),
            samples,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.samples.last().map(|s| s.close)
    }

    /// Mean of the volumes that are present; `None` when no sample carries one.
    pub fn average_volume(&self) -> Option<f64> {
        let volumes: Vec<f64> = self.samples.iter().filter_map(|s| s.volume).collect();
        if volumes.is_empty() {
            return None;
        }
        Some(volumes.iter().sum::<f64>() / volumes.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerEntry {
    pub symbol: String,
    pub name: String,
}

impl TickerEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub range: String,
    pub interval: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(String),
    #[error("invalid response status {0}")]
    InvalidResponse(u16),
    #[error("provider api error: {0}")]
    Api(String),
    #[error("cannot decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reasons a single ticker is left out of the report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no price data returned")]
    MissingData,
    #[error("average daily volume {average:.0} below threshold {threshold:.0}")]
    InsufficientVolume { average: f64, threshold: f64 },
    #[error("undefined statistic: {0}")]
    UndefinedStatistic(&'static str),
    #[error("computation error: {0}")]
    Computation(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("roster csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster xlsx error: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error("unsupported roster format: {0}")]
    UnsupportedFormat(String),
    #[error("roster contains no usable tickers")]
    Empty,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
