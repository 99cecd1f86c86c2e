use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single ticker and its share of the initial balance, in percent (0–100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingInput {
    pub symbol: String,
    pub percentage: f64,
}

impl HoldingInput {
    /// Symbols are normalised to upper case, as typed into the form.
    pub fn new(symbol: impl Into<String>, percentage: f64) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            percentage,
        }
    }

    /// A 0% holding contributes nothing and needs no price lookup.
    pub fn is_zero_allocation(&self) -> bool {
        self.percentage == 0.0
    }
}

/// Everything the user submits for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInput {
    pub client_name: String,
    pub start_date: NaiveDate,
    pub initial_balance: f64,
    #[serde(rename = "stocks")]
    pub holdings: Vec<HoldingInput>,
}

impl PortfolioInput {
    pub fn new(
        client_name: impl Into<String>,
        start_date: NaiveDate,
        initial_balance: f64,
        holdings: Vec<HoldingInput>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            start_date,
            initial_balance,
            holdings,
        }
    }

    /// Sum of all holding percentages.
    pub fn total_percentage(&self) -> f64 {
        self.holdings.iter().map(|h| h.percentage).sum()
    }
}
