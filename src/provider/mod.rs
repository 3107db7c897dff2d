pub mod fetcher;
pub mod traits;

pub use fetcher::YahooProvider;
pub use traits::PriceProvider;
