use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Result for one holding over the start-date → now interval.
///
/// Field names follow the history API's JSON (camelCase, with the absolute
/// return stored under `return`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPerformance {
    pub symbol: String,

    /// Percentage of the initial balance assigned to this holding
    pub allocation: f64,

    /// initial_balance × allocation / 100
    pub initial_value: f64,

    /// shares × current price
    pub current_value: f64,

    /// current_value − initial_value
    #[serde(rename = "return")]
    pub return_value: f64,

    /// return_value / initial_value × 100 (0 for a 0% holding)
    pub return_percentage: f64,
}

/// Aggregate result of one calculation run.
///
/// Created once per calculation and never mutated afterwards, apart from the
/// id assigned by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPerformance {
    /// Assigned by the history store on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub client_name: String,
    pub start_date: NaiveDate,
    pub initial_balance: f64,

    /// Σ stock current values
    pub current_value: f64,

    /// current_value − initial_balance
    pub total_return: f64,

    /// total_return / initial_balance × 100
    pub total_return_percentage: f64,

    /// Empty for summaries returned by the history list endpoint
    #[serde(default)]
    pub stocks: Vec<StockPerformance>,

    pub timestamp: DateTime<Utc>,
}

impl PortfolioPerformance {
    /// Copy of this record carrying the store-assigned id.
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Summaries from the list endpoint carry no per-stock rows.
    pub fn is_summary(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Record without per-stock rows, as returned by `HistoryStore::list`.
    pub fn summary(&self) -> Self {
        Self {
            stocks: Vec::new(),
            ..self.clone()
        }
    }
}
