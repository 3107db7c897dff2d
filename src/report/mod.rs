// Report rows and output dispatch
pub mod csv_sheet;
pub mod html;
pub mod xlsx_sheet;

use crate::analyzer::{AnalysisResult, EmaFit};
use crate::config::{OutputConfig, OutputFormat};
use crate::model::{ReportError, TickerEntry};
use crate::storage::SqliteSheet;
use crate::utils::{ensure_parent_dir, fmt2};
use chrono::{DateTime, Utc};

pub const COLUMNS: [&str; 13] = [
    "Ticker",
    "Name",
    "Last Price",
    "EMA Period Max Contacts",
    "EMA Max Contacts",
    "Trend Max Contacts",
    "Distance % Max Contacts",
    "Z-Score Max Contacts",
    "EMA Period Long Term",
    "EMA Long Term",
    "Trend Long Term",
    "Distance % Long Term",
    "Z-Score Long Term",
];

/// Metrics derived from one selected EMA. Every field is `None` when no
/// EMA was selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmaColumns {
    pub period: Option<usize>,
    pub ema: Option<f64>,
    pub trend: Option<bool>,
    pub distance_pct: Option<f64>,
    pub z_score: Option<f64>,
}

impl EmaColumns {
    pub fn from_fit(fit: Option<&EmaFit>, last_close: f64) -> Self {
        let Some(fit) = fit else {
            return Self::default();
        };
        let ema = fit.last_value;
        let distance_pct = (ema != 0.0).then(|| (last_close - ema) / ema * 100.0);

        Self {
            period: Some(fit.period),
            ema: Some(ema),
            trend: Some(last_close > ema),
            distance_pct,
            z_score: fit.z_score,
        }
    }

    fn cells(&self) -> [String; 5] {
        [
            self.period.map(|p| p.to_string()).unwrap_or_default(),
            fmt2(self.ema),
            match self.trend {
                Some(true) => "Trend".to_string(),
                _ => String::new(),
            },
            fmt2(self.distance_pct),
            fmt2(self.z_score),
        ]
    }
}

/// One output row, kept at full precision; rounding happens when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub ticker: String,
    pub name: String,
    pub last_price: f64,
    pub max_contacts: EmaColumns,
    pub long_term: EmaColumns,
}

impl ReportRow {
    pub fn build(entry: &TickerEntry, last_close: f64, analysis: &AnalysisResult) -> Self {
        Self {
            ticker: entry.symbol.clone(),
            name: entry.name.clone(),
            last_price: last_close,
            max_contacts: EmaColumns::from_fit(analysis.max_contacts.as_ref(), last_close),
            long_term: EmaColumns::from_fit(analysis.long_term.as_ref(), last_close),
        }
    }

    /// Rendered cells in `COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.ticker.clone(),
            self.name.clone(),
            fmt2(Some(self.last_price)),
        ];
        cells.extend(self.max_contacts.cells());
        cells.extend(self.long_term.cells());
        cells
    }
}

/// Writes the rows in the configured format, creating the output directory.
pub fn write_report(
    rows: &[ReportRow],
    output: &OutputConfig,
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    ensure_parent_dir(&output.path)?;
    match output.format {
        OutputFormat::Csv => csv_sheet::write_csv_file(&output.path, rows),
        OutputFormat::Xlsx => xlsx_sheet::write_xlsx_file(&output.path, rows),
        OutputFormat::Html => html::write_html_file(&output.path, rows, generated_at),
        OutputFormat::Sqlite => {
            let sheet = SqliteSheet::open(&output.path)?;
            sheet.replace_rows(rows, generated_at)?;
            Ok(())
        }
    }
}
