use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Raw `analysis` section as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ema_periods: Vec<usize>,
    pub tolerance: f64,
    pub rolling_window: usize,
    pub long_term_min_period: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ema_periods: (60..=320).step_by(10).collect(),
            tolerance: 0.01,
            rolling_window: 60,
            long_term_min_period: 220,
        }
    }
}

/// Validated, immutable parameters handed to the analyzer.
/// `ema_periods` is sorted ascending without duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    ema_periods: Vec<usize>,
    pub tolerance: f64,
    pub rolling_window: usize,
    pub long_term_min_period: usize,
}

impl AnalysisParams {
    pub fn new(
        mut ema_periods: Vec<usize>,
        tolerance: f64,
        rolling_window: usize,
        long_term_min_period: usize,
    ) -> Result<Self, ConfigError> {
        if ema_periods.is_empty() {
            return Err(ConfigError::Invalid("ema_periods must not be empty".into()));
        }
        if ema_periods.contains(&0) {
            return Err(ConfigError::Invalid("ema periods must be at least 1".into()));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive number, got {}",
                tolerance
            )));
        }
        if rolling_window < 2 {
            return Err(ConfigError::Invalid(format!(
                "rolling_window must be at least 2, got {}",
                rolling_window
            )));
        }

        ema_periods.sort_unstable();
        ema_periods.dedup();

        Ok(Self {
            ema_periods,
            tolerance,
            rolling_window,
            long_term_min_period,
        })
    }

    pub fn ema_periods(&self) -> &[usize] {
        &self.ema_periods
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        let raw = AnalysisConfig::default();
        Self {
            ema_periods: raw.ema_periods,
            tolerance: raw.tolerance,
            rolling_window: raw.rolling_window,
            long_term_min_period: raw.long_term_min_period,
        }
    }
}

impl TryFrom<&AnalysisConfig> for AnalysisParams {
    type Error = ConfigError;

    fn try_from(cfg: &AnalysisConfig) -> Result<Self, Self::Error> {
        Self::new(
            cfg.ema_periods.clone(),
            cfg.tolerance,
            cfg.rolling_window,
            cfg.long_term_min_period,
        )
    }
}

/// Lookback range and sampling interval, in the provider's vocabulary.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataWindow {
    pub range: String,
    pub interval: String,
}

impl DataWindow {
    fn new(range: &str, interval: &str) -> Self {
        Self {
            range: range.to_string(),
            interval: interval.to_string(),
        }
    }
}

fn default_price_window() -> DataWindow {
    DataWindow::new("5y", "1wk")
}

fn default_volume_window() -> DataWindow {
    DataWindow::new("1mo", "1d")
}

fn default_volume_threshold() -> f64 {
    5000.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Xlsx,
    Html,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            path: PathBuf::from("output/results.html"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub roster_path: PathBuf,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,
    #[serde(default = "default_price_window")]
    pub price_window: DataWindow,
    #[serde(default = "default_volume_window")]
    pub volume_window: DataWindow,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Checks the whole file and returns the analyzer parameters.
    pub fn validate(&self) -> Result<AnalysisParams, ConfigError> {
        if !(self.volume_threshold.is_finite() && self.volume_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "volume_threshold must be a non-negative number, got {}",
                self.volume_threshold
            )));
        }
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_seconds must be at least 1".into(),
            ));
        }
        AnalysisParams::try_from(&self.analysis)
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    Ok(config)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{ "roster_path": "tickers.csv" }"#).unwrap();
        assert_eq!(cfg.volume_threshold, 5000.0);
        assert_eq!(cfg.price_window, DataWindow::new("5y", "1wk"));
        assert_eq!(cfg.volume_window, DataWindow::new("1mo", "1d"));
        assert_eq!(cfg.output.format, OutputFormat::Html);

        let params = cfg.validate().unwrap();
        assert_eq!(params.ema_periods().first(), Some(&60));
        assert_eq!(params.ema_periods().last(), Some(&320));
        assert_eq!(params.ema_periods().len(), 27);
        assert_eq!(params.tolerance, 0.01);
        assert_eq!(params.rolling_window, 60);
        assert_eq!(params.long_term_min_period, 220);
    }

    #[test]
    fn partial_analysis_section_keeps_other_defaults() {
        let cfg = parse_config(
            r#"{
                "roster_path": "tickers.html",
                "analysis": { "tolerance": 0.02 },
                "output": { "format": "sqlite", "path": "out/results.db" }
            }"#,
        )
        .unwrap();
        let params = cfg.validate().unwrap();
        assert_eq!(params.tolerance, 0.02);
        assert_eq!(params.rolling_window, 60);
        assert_eq!(cfg.output.format, OutputFormat::Sqlite);
    }

    #[test]
    fn periods_are_sorted_and_deduplicated() {
        let params = AnalysisParams::new(vec![200, 60, 100, 60], 0.01, 60, 220).unwrap();
        assert_eq!(params.ema_periods(), &[60, 100, 200]);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(AnalysisParams::new(vec![], 0.01, 60, 220).is_err());
        assert!(AnalysisParams::new(vec![0, 10], 0.01, 60, 220).is_err());
        assert!(AnalysisParams::new(vec![10], 0.0, 60, 220).is_err());
        assert!(AnalysisParams::new(vec![10], f64::NAN, 60, 220).is_err());
        assert!(AnalysisParams::new(vec![10], 0.01, 1, 220).is_err());
    }

    #[test]
    fn negative_volume_threshold_is_rejected() {
        let cfg = parse_config(r#"{ "roster_path": "t.csv", "volume_threshold": -1 }"#).unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = parse_config(
            r#"{ "roster_path": "t.csv", "provider": { "timeout_seconds": 0 } }"#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("timeout")));
    }

    #[test]
    fn xlsx_output_format_is_accepted() {
        let cfg = parse_config(
            r#"{ "roster_path": "tickers.xlsx", "output": { "format": "xlsx", "path": "out/results.xlsx" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Xlsx);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_roster_path_fails_to_parse() {
        assert!(matches!(parse_config("{}"), Err(ConfigError::Parse(_))));
    }
}
