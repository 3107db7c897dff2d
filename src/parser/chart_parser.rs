// Yahoo Finance chart payload decoding
use crate::model::{PriceSample, PriceSeries, ProviderError};
use crate::utils::timestamp_from_unix;
use serde::Deserialize;

pub trait ChartParser {
    fn parse(&self, symbol: &str, body: &str) -> Result<PriceSeries, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooChartParser;

impl YahooChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl ChartParser for YahooChartParser {
    /// Samples without a close are dropped; a missing volume stays `None`.
    fn parse(&self, symbol: &str, body: &str) -> Result<PriceSeries, ProviderError> {
        let envelope: ChartEnvelope = serde_json::from_str(body)?;

        if let Some(err) = envelope.chart.error {
            let description = err.description.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", err.code, description)));
        }

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(PriceSeries::new(symbol, Vec::new()));
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let samples = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = quote.close.get(i).copied().flatten()?;
                Some(PriceSample {
                    timestamp: timestamp_from_unix(ts)?,
                    close,
                    volume: quote.volume.get(i).copied().flatten(),
                })
            })
            .collect();

        Ok(PriceSeries::new(symbol, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "currency": "EUR", "symbol": "AI.PA" },
                "timestamp": [1704067200, 1704672000, 1705276800],
                "indicators": {
                    "quote": [{
                        "open": [170.1, 171.0, 172.0],
                        "close": [171.5, null, 173.25],
                        "volume": [120000, 98000, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_samples_and_skips_null_closes() {
        let series = YahooChartParser::new().parse("AI.PA", BODY).unwrap();
        assert_eq!(series.symbol, "AI.PA");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![171.5, 173.25]);
        assert_eq!(series.samples[0].volume, Some(120000.0));
        assert_eq!(series.samples[1].volume, None);
        assert_eq!(series.samples[0].timestamp.timestamp(), 1704067200);
    }

    #[test]
    fn api_error_is_reported() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = YahooChartParser::new().parse("XXX", body).unwrap_err();
        assert!(matches!(err, ProviderError::Api(ref msg) if msg.starts_with("Not Found")));
    }

    #[test]
    fn result_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = YahooChartParser::new().parse("NEW.PA", body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = YahooChartParser::new().parse("AI.PA", "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
