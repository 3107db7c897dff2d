use crate::model::{HistoryRequest, PriceSeries, ProviderError};

/// Source of price history. An unknown or silent symbol yields an empty
/// series rather than an error.
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_history(&self, req: &HistoryRequest) -> Result<PriceSeries, ProviderError>;
}
