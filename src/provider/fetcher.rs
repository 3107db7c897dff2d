use crate::config::ProviderConfig;
use crate::model::{HistoryRequest, PriceSeries, ProviderError};
use crate::parser::{ChartParser, YahooChartParser};
use crate::provider::traits::PriceProvider;

use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

pub struct YahooProvider {
    client: Client,
    base_url: Url,
    parser: YahooChartParser,
}

impl YahooProvider {
    pub fn new(cfg: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) EmaContact/0.1")
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let base_url = Url::parse(&cfg.base_url)
            .map_err(|e| ProviderError::Http(format!("invalid base url {}: {}", cfg.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Http(format!(
                "base url cannot carry a path: {}",
                cfg.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            parser: YahooChartParser::new(),
        })
    }

    /// Appends `v8/finance/chart/{symbol}` to the base path. The symbol is
    /// percent-encoded as a single path segment.
    fn build_url(&self, req: &HistoryRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart"])
                .push(&req.symbol);
        }
        url
    }
}

#[async_trait::async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_history(&self, req: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        let url = self.build_url(req);
        debug!("GET {} range={} interval={}", url, req.range, req.interval);

        let response = self
            .client
            .get(url)
            .query(&[("range", req.range.as_str()), ("interval", req.interval.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        // Yahoo reports unknown symbols as 404 with a chart error body.
        if !status.is_success() {
            return match self.parser.parse(&req.symbol, &body) {
                Err(api @ ProviderError::Api(_)) => Err(api),
                _ => Err(ProviderError::InvalidResponse(status.as_u16())),
            };
        }

        self.parser.parse(&req.symbol, &body)
    }
}
