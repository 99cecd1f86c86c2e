use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::settings::ProviderKind;

/// Trait abstraction for all price data sources.
///
/// Each source (the backend proxy, Marketstack, Yahoo Finance) implements
/// this trait. If an API stops working or changes, only that one
/// implementation is replaced; the calculation code is untouched.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which configuration value selects this provider.
    fn kind(&self) -> ProviderKind;

    /// Latest available close for a symbol.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Close on (or nearest to) a specific trading date.
    async fn get_historical_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError>;
}
