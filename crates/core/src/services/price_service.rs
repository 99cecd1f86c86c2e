use chrono::NaiveDate;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::HoldingInput;
use crate::models::price::PriceQuote;
use crate::models::settings::ProviderKind;
use crate::providers::registry::PriceProviderRegistry;
use crate::providers::traits::PriceProvider;
use crate::services::allocation_service::check_prices;
use crate::services::trading_calendar::TradingCalendar;

/// Fetches the (historical, current) price pair each holding needs.
///
/// Lookups for different symbols run concurrently and are joined before the
/// allocation math. The first failure aborts the rest: there are no retries
/// and no partial results.
pub struct PriceService {
    registry: PriceProviderRegistry,
    provider: ProviderKind,
    calendar: TradingCalendar,
    timeout: Option<Duration>,
}

impl PriceService {
    pub fn new(
        registry: PriceProviderRegistry,
        provider: ProviderKind,
        calendar: TradingCalendar,
    ) -> Self {
        Self {
            registry,
            provider,
            calendar,
            timeout: None,
        }
    }

    /// Abort a whole batch of lookups after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured provider's name, if it is registered.
    pub fn provider_name(&self) -> Option<String> {
        self.registry
            .get_provider_for(self.provider)
            .map(|p| p.name().to_string())
    }

    fn active_provider(&self) -> Result<&dyn PriceProvider, CoreError> {
        self.registry
            .get_provider_for(self.provider)
            .ok_or_else(|| CoreError::NoProvider(self.provider.to_string()))
    }

    /// Fetch both prices for one symbol.
    ///
    /// The start date is resolved to a trading day first, so weekends are
    /// never sent to the price source. Errors name the symbol.
    pub async fn fetch_quote(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<PriceQuote, CoreError> {
        let provider = self.active_provider()?;
        let trading_date = self.calendar.resolve(start_date, today);
        log::debug!(
            "Fetching {symbol} from {} (start {start_date} → {trading_date})",
            provider.name()
        );

        let (historical, current) = futures::try_join!(
            provider.get_historical_price(symbol, trading_date),
            provider.get_current_price(symbol),
        )
        .map_err(|e| CoreError::lookup(symbol, e))?;

        let quote = PriceQuote::new(trading_date, historical, current);
        check_prices(symbol, &quote).map_err(|e| CoreError::lookup(symbol, e))?;
        Ok(quote)
    }

    /// Fetch quotes for every distinct symbol with a non-zero allocation.
    pub async fn fetch_quotes(
        &self,
        holdings: &[HoldingInput],
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<HashMap<String, PriceQuote>, CoreError> {
        let mut symbols: Vec<&str> = holdings
            .iter()
            .filter(|h| !h.is_zero_allocation())
            .map(|h| h.symbol.as_str())
            .collect();
        symbols.sort_unstable();
        symbols.dedup();

        let lookups = symbols.iter().map(|symbol| async move {
            let quote = self.fetch_quote(symbol, start_date, today).await?;
            Ok::<_, CoreError>((symbol.to_string(), quote))
        });

        let joined = try_join_all(lookups);
        let quotes = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, joined)
                .await
                .map_err(|_| CoreError::Timeout(limit.as_secs()))??,
            None => joined.await?,
        };

        Ok(quotes.into_iter().collect())
    }
}
