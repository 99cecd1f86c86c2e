pub mod display;
pub mod errors;
pub mod http;
pub mod i18n;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    chart::PerformanceCharts,
    holding::PortfolioInput,
    performance::PortfolioPerformance,
    settings::{HistoryStoreKind, Settings},
};
use providers::registry::PriceProviderRegistry;
use services::{
    allocation_service::AllocationService,
    chart_service::ChartService,
    price_service::PriceService,
    trading_calendar::{local_today, DateSuggestions, TradingCalendar},
};
use std::time::Duration;
use storage::{
    file::FileHistoryStore, memory::MemoryHistoryStore, remote::RemoteHistoryStore,
    traits::HistoryStore,
};

use errors::CoreError;
use i18n::Locale;

/// Result of `calculate_and_save`.
///
/// The performance is kept even when saving failed; such a run simply
/// never shows up in the history.
#[derive(Debug)]
pub struct CalculationOutcome {
    /// Carries the store-assigned id when the save succeeded
    pub performance: PortfolioPerformance,
    pub save_error: Option<CoreError>,
}

impl CalculationOutcome {
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none() && self.performance.id.is_some()
    }
}

/// Main entry point for the portfolio calculator core library.
/// Holds the settings and all services needed to run a calculation.
#[must_use]
pub struct PortfolioCalculator {
    settings: Settings,
    calendar: TradingCalendar,
    allocation_service: AllocationService,
    price_service: PriceService,
    chart_service: ChartService,
    history: Box<dyn HistoryStore>,
}

impl std::fmt::Debug for PortfolioCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioCalculator")
            .field("settings", &self.settings)
            .field("provider", &self.price_service.provider_name())
            .field("history", &self.history.name())
            .finish()
    }
}

impl PortfolioCalculator {
    /// Build a calculator with the default providers and the history store
    /// selected in `settings`.
    pub fn new(settings: Settings) -> Self {
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        let history: Box<dyn HistoryStore> = match settings.history_store {
            HistoryStoreKind::Remote => Box::new(RemoteHistoryStore::new(
                settings.base_url(),
                settings.request_timeout_secs,
            )),
            HistoryStoreKind::File => Box::new(FileHistoryStore::new(&settings.history_file)),
            HistoryStoreKind::Memory => Box::new(MemoryHistoryStore::new()),
        };
        Self::with_components(settings, registry, history)
    }

    /// Build a calculator from explicit parts (custom providers, test stores).
    pub fn with_components(
        settings: Settings,
        registry: PriceProviderRegistry,
        history: Box<dyn HistoryStore>,
    ) -> Self {
        let calendar = TradingCalendar::new(settings.history_lookback_months);
        let price_service = PriceService::new(registry, settings.price_provider, calendar)
            .with_timeout(settings.calculation_timeout_secs.map(Duration::from_secs));
        Self {
            settings,
            calendar,
            allocation_service: AllocationService::new(),
            price_service,
            chart_service: ChartService::new(),
            history,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Translation lookup for the configured language.
    pub fn locale(&self) -> Locale {
        Locale::new(self.settings.language)
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Pre-flight checks: allocations, balance, client name and start date.
    /// No network call is made.
    pub fn validate(&self, input: &PortfolioInput, today: NaiveDate) -> Result<(), CoreError> {
        self.allocation_service.validate_input(input)?;
        self.calendar.validate_start_date(input.start_date, today)
    }

    // ── Calculation ─────────────────────────────────────────────────

    /// Validate, fetch prices and compute the result, as of now. Date
    /// bounds use the local calendar date; the record timestamp is UTC.
    pub async fn calculate(&self, input: &PortfolioInput) -> Result<PortfolioPerformance, CoreError> {
        self.calculate_at(input, local_today(), Utc::now()).await
    }

    /// Same as `calculate` with an explicit reference date and timestamp.
    pub async fn calculate_at(
        &self,
        input: &PortfolioInput,
        today: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Result<PortfolioPerformance, CoreError> {
        self.validate(input, today)?;

        let quotes = self
            .price_service
            .fetch_quotes(&input.holdings, input.start_date, today)
            .await?;

        let performance = self.allocation_service.compute(input, &quotes, timestamp)?;
        log::info!(
            "Calculated portfolio for {}: {:.2} → {:.2} ({:+.2}%)",
            performance.client_name,
            performance.initial_balance,
            performance.current_value,
            performance.total_return_percentage
        );
        Ok(performance)
    }

    /// Calculate, then persist. A failed save does not discard the result.
    pub async fn calculate_and_save(
        &self,
        input: &PortfolioInput,
    ) -> Result<CalculationOutcome, CoreError> {
        let performance = self.calculate(input).await?;
        Ok(self.save_outcome(performance).await)
    }

    /// Persist an already computed result, keeping it on failure.
    pub async fn save_outcome(&self, performance: PortfolioPerformance) -> CalculationOutcome {
        match self.history.create(&performance).await {
            Ok(stored) => {
                log::info!("Saved calculation as history record {:?}", stored.id);
                CalculationOutcome {
                    performance: stored,
                    save_error: None,
                }
            }
            Err(e) => {
                log::warn!("Failed to save calculation to {}: {e}", self.history.name());
                CalculationOutcome {
                    performance,
                    save_error: Some(e),
                }
            }
        }
    }

    // ── History ─────────────────────────────────────────────────────

    /// All saved runs, in the store's order.
    pub async fn history(&self) -> Result<Vec<PortfolioPerformance>, CoreError> {
        self.history.list().await
    }

    /// One saved run with its per-stock rows.
    pub async fn history_detail(&self, id: i64) -> Result<PortfolioPerformance, CoreError> {
        self.history.get(id).await
    }

    // ── Dates & charts ──────────────────────────────────────────────

    /// Allowed start-date range `(min, max)` for the date picker.
    pub fn start_date_bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            self.calendar.min_start_date(today),
            self.calendar.max_start_date(today),
        )
    }

    /// 1/3/6-month start-date shortcuts.
    pub fn date_suggestions(&self, today: NaiveDate) -> DateSuggestions {
        self.calendar.suggestions(today)
    }

    /// Trading day the historical price is requested for.
    pub fn resolve_trading_date(&self, requested: NaiveDate, today: NaiveDate) -> NaiveDate {
        self.calendar.resolve(requested, today)
    }

    /// Allocation and return chart data for a result.
    pub fn charts(&self, performance: &PortfolioPerformance) -> PerformanceCharts {
        self.chart_service.charts(performance)
    }
}
