use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// The two prices a holding needs: at the (resolved) start date and now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Trading date the historical price was requested for
    pub historical_date: NaiveDate,
    pub historical_price: f64,
    pub current_price: f64,
}

impl PriceQuote {
    pub fn new(historical_date: NaiveDate, historical_price: f64, current_price: f64) -> Self {
        Self {
            historical_date,
            historical_price,
            current_price,
        }
    }
}

/// Pick the point whose date is closest to `target`. Ties go to the earlier
/// entry in `points`.
pub fn closest_to(points: &[PricePoint], target: NaiveDate) -> Option<&PricePoint> {
    points
        .iter()
        .min_by_key(|p| (p.date - target).num_days().abs())
}
