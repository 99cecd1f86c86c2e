use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::holding::{HoldingInput, PortfolioInput};
use crate::models::performance::{PortfolioPerformance, StockPerformance};
use crate::models::price::PriceQuote;

/// Allowed deviation of the percentage sum from 100.
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

/// Slack for binary rounding, so a sum of exactly 99.99 or 100.01 passes.
const FLOAT_SLACK: f64 = 1e-9;

/// Turns percentage allocations and prices into per-stock and portfolio returns.
///
/// Stateless: the same input and quotes always produce the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Check the holdings list before any price is requested.
    pub fn validate_allocations(&self, holdings: &[HoldingInput]) -> Result<(), CoreError> {
        if holdings.is_empty() {
            return Err(CoreError::Validation(
                "At least one holding is required".into(),
            ));
        }

        for holding in holdings {
            if holding.symbol.trim().is_empty() {
                return Err(CoreError::Validation("Stock symbol cannot be empty".into()));
            }
            if !holding.percentage.is_finite()
                || holding.percentage < 0.0
                || holding.percentage > 100.0
            {
                return Err(CoreError::Validation(format!(
                    "Allocation for {} must be between 0 and 100 (got {})",
                    holding.symbol, holding.percentage
                )));
            }
        }

        let total: f64 = holdings.iter().map(|h| h.percentage).sum();
        if (total - 100.0).abs() > ALLOCATION_TOLERANCE + FLOAT_SLACK {
            return Err(CoreError::AllocationSum { total });
        }

        Ok(())
    }

    /// Validate everything except the start date (which needs "today").
    pub fn validate_input(&self, input: &PortfolioInput) -> Result<(), CoreError> {
        if input.client_name.trim().is_empty() {
            return Err(CoreError::Validation("Client name cannot be empty".into()));
        }
        if !input.initial_balance.is_finite() || input.initial_balance <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Initial balance must be positive (got {})",
                input.initial_balance
            )));
        }
        self.validate_allocations(&input.holdings)
    }

    /// Performance of one holding.
    ///
    /// A 0% holding yields all zeros without touching the quote. Otherwise the
    /// quote is required, the historical price must be positive and the
    /// current price non-negative.
    pub fn compute_stock(
        &self,
        initial_balance: f64,
        holding: &HoldingInput,
        quote: Option<&PriceQuote>,
    ) -> Result<StockPerformance, CoreError> {
        if holding.is_zero_allocation() {
            return Ok(StockPerformance {
                symbol: holding.symbol.clone(),
                allocation: 0.0,
                initial_value: 0.0,
                current_value: 0.0,
                return_value: 0.0,
                return_percentage: 0.0,
            });
        }

        let quote = quote.ok_or_else(|| CoreError::PriceNotAvailable {
            symbol: holding.symbol.clone(),
            date: "the start date".into(),
        })?;
        check_prices(&holding.symbol, quote)?;

        let initial_value = initial_balance * holding.percentage / 100.0;
        let shares = initial_value / quote.historical_price;
        let current_value = shares * quote.current_price;
        let return_value = current_value - initial_value;
        let return_percentage = return_value / initial_value * 100.0;

        Ok(StockPerformance {
            symbol: holding.symbol.clone(),
            allocation: holding.percentage,
            initial_value,
            current_value,
            return_value,
            return_percentage,
        })
    }

    /// Compute the full portfolio result from already-fetched quotes.
    ///
    /// `quotes` is keyed by symbol. Any holding with a non-zero allocation and
    /// no usable quote fails the whole calculation.
    pub fn compute(
        &self,
        input: &PortfolioInput,
        quotes: &HashMap<String, PriceQuote>,
        timestamp: DateTime<Utc>,
    ) -> Result<PortfolioPerformance, CoreError> {
        self.validate_input(input)?;

        let stocks = input
            .holdings
            .iter()
            .map(|holding| {
                let quote = quotes.get(&holding.symbol);
                if quote.is_none() && !holding.is_zero_allocation() {
                    return Err(CoreError::PriceNotAvailable {
                        symbol: holding.symbol.clone(),
                        date: input.start_date.to_string(),
                    });
                }
                self.compute_stock(input.initial_balance, holding, quote)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let current_value: f64 = stocks.iter().map(|s| s.current_value).sum();
        let total_return = current_value - input.initial_balance;
        let total_return_percentage = total_return / input.initial_balance * 100.0;

        Ok(PortfolioPerformance {
            id: None,
            client_name: input.client_name.clone(),
            start_date: input.start_date,
            initial_balance: input.initial_balance,
            current_value,
            total_return,
            total_return_percentage,
            stocks,
            timestamp,
        })
    }
}

/// Reject prices that would make the share math meaningless.
pub fn check_prices(symbol: &str, quote: &PriceQuote) -> Result<(), CoreError> {
    if !quote.historical_price.is_finite() || quote.historical_price <= 0.0 {
        return Err(CoreError::InvalidPrice {
            symbol: symbol.to_string(),
            price: quote.historical_price,
        });
    }
    if !quote.current_price.is_finite() || quote.current_price < 0.0 {
        return Err(CoreError::InvalidPrice {
            symbol: symbol.to_string(),
            price: quote.current_price,
        });
    }
    Ok(())
}
