use crate::analyzer::contacts::{BestTracker, count_contacts};
use crate::analyzer::ema::ema;
use crate::analyzer::zscore::z_score_last;
use crate::config::AnalysisParams;
use crate::model::AnalysisError;

/// One selected EMA and the metrics taken from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaFit {
    pub period: usize,
    pub contacts: usize,
    pub last_value: f64,
    pub z_score: Option<f64>,
}

/// Best EMA by contacts overall and among long-term periods.
/// Either side is `None` when no candidate reached a single contact.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub max_contacts: Option<EmaFit>,
    pub long_term: Option<EmaFit>,
}

/// Trait defining the interface for a close-price analyzer.
pub trait Analyzer {
    fn analyze(&self, closes: &[f64]) -> Result<AnalysisResult, AnalysisError>;
}

/// Implementation of the EMA contact analyzer.
pub struct AnalyzerImpl {
    params: AnalysisParams,
}

impl AnalyzerImpl {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }
}

impl Analyzer for AnalyzerImpl {
    /// Walks the candidate periods in ascending order, keeping the strict
    /// maximum of contacts overall and, separately, among periods at or
    /// above the long-term floor.
    fn analyze(&self, closes: &[f64]) -> Result<AnalysisResult, AnalysisError> {
        if closes.is_empty() {
            return Err(AnalysisError::MissingData);
        }

        let params = &self.params;
        let mut overall = BestTracker::new();
        let mut long_term = BestTracker::new();

        for &period in params.ema_periods() {
            let series = ema(closes, period);
            if let Some(bad) = series.iter().position(|v| !v.is_finite()) {
                return Err(AnalysisError::Computation(format!(
                    "EMA {} is not finite at sample {}",
                    period, bad
                )));
            }

            let contacts = count_contacts(closes, &series, params.tolerance);
            overall.offer(contacts, || (period, series.clone()));
            if period >= params.long_term_min_period {
                long_term.offer(contacts, || (period, series.clone()));
            }
        }

        Ok(AnalysisResult {
            max_contacts: self.fit(closes, overall),
            long_term: self.fit(closes, long_term),
        })
    }
}

impl AnalyzerImpl {
    fn fit(&self, closes: &[f64], tracker: BestTracker<(usize, Vec<f64>)>) -> Option<EmaFit> {
        let (contacts, (period, series)) = tracker.into_best()?;
        Some(EmaFit {
            period,
            contacts,
            last_value: *series.last()?,
            z_score: z_score_last(closes, &series, self.params.rolling_window),
        })
    }
}
