// ═══════════════════════════════════════════════════════════════════
// Integration Tests — PortfolioCalculator end to end with mock
// providers and in-memory history
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use portfolio_calc_core::errors::CoreError;
use portfolio_calc_core::i18n::Language;
use portfolio_calc_core::models::holding::{HoldingInput, PortfolioInput};
use portfolio_calc_core::models::performance::PortfolioPerformance;
use portfolio_calc_core::models::settings::{ProviderKind, Settings};
use portfolio_calc_core::providers::registry::PriceProviderRegistry;
use portfolio_calc_core::providers::traits::PriceProvider;
use portfolio_calc_core::services::trading_calendar::local_today;
use portfolio_calc_core::storage::memory::MemoryHistoryStore;
use portfolio_calc_core::storage::traits::HistoryStore;
use portfolio_calc_core::PortfolioCalculator;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    make_date(2025, 6, 13)
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 13, 15, 30, 0).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

struct MockPriceProvider {
    prices: HashMap<&'static str, (f64, f64)>,
    calls: Arc<AtomicUsize>,
}

impl MockPriceProvider {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        let prices = HashMap::from([("AAPL", (150.0, 180.0)), ("MSFT", (300.0, 330.0))]);
        Self { prices, calls }
    }

    fn lookup(&self, symbol: &str, pick: impl Fn(&(f64, f64)) -> f64) -> Result<f64, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prices
            .get(symbol)
            .map(pick)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                date: "latest".into(),
            })
    }
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Backend
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.lookup(symbol, |p| p.1)
    }

    async fn get_historical_price(
        &self,
        symbol: &str,
        _date: NaiveDate,
    ) -> Result<f64, CoreError> {
        self.lookup(symbol, |p| p.0)
    }
}

/// History store whose writes always fail.
struct BrokenStore;

#[async_trait]
impl HistoryStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn list(&self) -> Result<Vec<PortfolioPerformance>, CoreError> {
        Ok(Vec::new())
    }

    async fn get(&self, id: i64) -> Result<PortfolioPerformance, CoreError> {
        Err(CoreError::HistoryNotFound(id))
    }

    async fn create(
        &self,
        _performance: &PortfolioPerformance,
    ) -> Result<PortfolioPerformance, CoreError> {
        Err(CoreError::Persistence("Failed to connect to database (HTTP 500)".into()))
    }
}

fn make_calculator_with(history: Box<dyn HistoryStore>) -> (PortfolioCalculator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = PriceProviderRegistry::new();
    registry.register(Box::new(MockPriceProvider::new(calls.clone())));
    let calculator = PortfolioCalculator::with_components(Settings::default(), registry, history);
    (calculator, calls)
}

fn make_calculator() -> (PortfolioCalculator, Arc<AtomicUsize>) {
    make_calculator_with(Box::new(MemoryHistoryStore::new()))
}

fn sample_input() -> PortfolioInput {
    PortfolioInput::new(
        "Alice",
        make_date(2025, 1, 15),
        500_000.0,
        vec![HoldingInput::new("AAPL", 60.0), HoldingInput::new("MSFT", 40.0)],
    )
}

// ═══════════════════════════════════════════════════════════════════
// Calculation
// ═══════════════════════════════════════════════════════════════════

mod calculation {
    use super::*;

    #[tokio::test]
    async fn full_calculation() {
        let (calc, calls) = make_calculator();
        let perf = calc.calculate_at(&sample_input(), today(), now()).await.unwrap();

        assert_close(perf.current_value, 580_000.0);
        assert_close(perf.total_return, 80_000.0);
        assert_close(perf.total_return_percentage, 16.0);
        assert_eq!(perf.stocks.len(), 2);
        assert_eq!(perf.timestamp, now());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn bad_allocation_makes_no_lookup() {
        let (calc, calls) = make_calculator();
        let mut input = sample_input();
        input.holdings[1].percentage = 30.0;

        let err = calc.calculate_at(&input, today(), now()).await.unwrap_err();
        assert!(matches!(err, CoreError::AllocationSum { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn start_date_outside_window_makes_no_lookup() {
        let (calc, calls) = make_calculator();
        let mut input = sample_input();
        input.start_date = make_date(2023, 1, 3);

        let err = calc.calculate_at(&input, today(), now()).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_symbol_fails_whole_run() {
        let (calc, _) = make_calculator();
        let input = PortfolioInput::new(
            "Alice",
            make_date(2025, 1, 15),
            1_000.0,
            vec![HoldingInput::new("AAPL", 50.0), HoldingInput::new("GONE", 50.0)],
        );

        let err = calc.calculate_at(&input, today(), now()).await.unwrap_err();
        assert!(err.to_string().contains("GONE"), "{err}");
    }

    #[tokio::test]
    async fn latest_local_start_date_is_accepted() {
        let (calc, _) = make_calculator();
        let (_, max) = calc.start_date_bounds(local_today());
        let mut input = sample_input();
        input.start_date = max;

        let perf = calc.calculate(&input).await.unwrap();
        assert_eq!(perf.start_date, max);
        assert_close(perf.total_return_percentage, 16.0);
    }

    #[tokio::test]
    async fn zero_allocation_symbol_is_never_looked_up() {
        let (calc, calls) = make_calculator();
        let input = PortfolioInput::new(
            "Alice",
            make_date(2025, 1, 15),
            1_000.0,
            vec![HoldingInput::new("AAPL", 100.0), HoldingInput::new("GONE", 0.0)],
        );

        let perf = calc.calculate_at(&input, today(), now()).await.unwrap();
        assert_eq!(perf.stocks[1].return_percentage, 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Saving and history
// ═══════════════════════════════════════════════════════════════════

mod history {
    use super::*;

    #[tokio::test]
    async fn save_then_browse() {
        let (calc, _) = make_calculator();
        let perf = calc.calculate_at(&sample_input(), today(), now()).await.unwrap();

        let outcome = calc.save_outcome(perf.clone()).await;
        assert!(outcome.is_saved());
        assert_eq!(outcome.performance.id, Some(1));

        let list = calc.history().await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].is_summary());
        assert_eq!(list[0].client_name, "Alice");

        let detail = calc.history_detail(1).await.unwrap();
        assert_eq!(detail.stocks, perf.stocks);
        assert_eq!(detail.total_return, perf.total_return);
    }

    #[tokio::test]
    async fn failed_save_keeps_result() {
        let (calc, _) = make_calculator_with(Box::new(BrokenStore));
        let perf = calc.calculate_at(&sample_input(), today(), now()).await.unwrap();

        let outcome = calc.save_outcome(perf.clone()).await;
        assert!(!outcome.is_saved());
        assert!(matches!(outcome.save_error, Some(CoreError::Persistence(_))));
        assert_eq!(outcome.performance, perf);
        assert!(calc.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let (calc, _) = make_calculator();
        assert!(matches!(
            calc.history_detail(99).await,
            Err(CoreError::HistoryNotFound(99))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Dates, charts and locale
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    #[test]
    fn start_date_bounds_on_weekend() {
        let (calc, _) = make_calculator();
        let (min, max) = calc.start_date_bounds(make_date(2025, 6, 15));
        assert_eq!(min, make_date(2024, 6, 15));
        assert_eq!(max, make_date(2025, 6, 13));
    }

    #[test]
    fn resolve_trading_date_moves_weekend_back() {
        let (calc, _) = make_calculator();
        assert_eq!(
            calc.resolve_trading_date(make_date(2025, 1, 18), today()),
            make_date(2025, 1, 17)
        );
    }

    #[test]
    fn date_suggestions_are_weekdays() {
        let (calc, _) = make_calculator();
        let s = calc.date_suggestions(make_date(2025, 6, 15));
        assert_eq!(s.one_month, make_date(2025, 5, 15));
    }

    #[tokio::test]
    async fn charts_follow_result() {
        let (calc, _) = make_calculator();
        let perf = calc.calculate_at(&sample_input(), today(), now()).await.unwrap();
        let charts = calc.charts(&perf);
        assert_eq!(charts.allocation.len(), 2);
        assert_eq!(charts.returns[0].symbol, "AAPL");
    }

    #[test]
    fn locale_follows_settings() {
        let (calc, _) = make_calculator();
        assert_eq!(calc.locale().language(), Language::Zh);

        let settings = Settings {
            language: Language::En,
            ..Settings::default()
        };
        let calc = PortfolioCalculator::with_components(
            settings,
            PriceProviderRegistry::new(),
            Box::new(MemoryHistoryStore::new()),
        );
        assert_eq!(calc.locale().t("title"), "Portfolio Management System");
    }
}
