// Analyzer module: EMA computation, contact search and Z-score.

pub mod contacts;
pub mod ema;
pub mod ema_analysis;
pub mod zscore;

// Re-export the main Analyzer implementation for ease of use.
pub use ema_analysis::{AnalysisResult, Analyzer, AnalyzerImpl, EmaFit};
