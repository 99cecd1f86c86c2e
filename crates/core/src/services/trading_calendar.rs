use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Number of candidate days (requested date plus six before it) scanned
/// when looking for a trading day.
pub const TRADING_DAY_WINDOW: i64 = 7;

/// Start-date shortcuts offered next to the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSuggestions {
    pub one_month: NaiveDate,
    pub three_months: NaiveDate,
    pub six_months: NaiveDate,
}

/// Weekday-based trading calendar.
///
/// Markets are presumed open Monday to Friday; holidays are not modelled,
/// the price source picks the nearest bar for those. Every method takes
/// `today` explicitly so results do not depend on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingCalendar {
    lookback_months: u32,
}

impl TradingCalendar {
    pub fn new(lookback_months: u32) -> Self {
        Self { lookback_months }
    }

    pub fn lookback_months(&self) -> u32 {
        self.lookback_months
    }

    /// Resolve a requested date to the nearest trading day on or before it.
    ///
    /// Future dates are clamped to `today` first. Scans the candidate and the
    /// six preceding calendar days; if none is a weekday the requested date
    /// comes back unchanged.
    pub fn resolve(&self, requested: NaiveDate, today: NaiveDate) -> NaiveDate {
        let start = requested.min(today);
        (0..TRADING_DAY_WINDOW)
            .map(|offset| start - Duration::days(offset))
            .find(|candidate| is_trading_day(*candidate))
            .unwrap_or(requested)
    }

    /// Latest selectable start date: today, or Friday when today is a weekend.
    pub fn max_start_date(&self, today: NaiveDate) -> NaiveDate {
        previous_weekday(today)
    }

    /// Earliest selectable start date: today minus the look-back window.
    pub fn min_start_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.lookback_months))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Reject start dates outside `[min_start_date, max_start_date]`.
    pub fn validate_start_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
        let min = self.min_start_date(today);
        let max = self.max_start_date(today);
        if date < min || date > max {
            return Err(CoreError::Validation(format!(
                "Start date {date} must be between {min} and {max}"
            )));
        }
        Ok(())
    }

    /// Shortcuts 1, 3 and 6 months back, moved off weekends.
    pub fn suggestions(&self, today: NaiveDate) -> DateSuggestions {
        let months_back = |n: u32| {
            let date = today.checked_sub_months(Months::new(n)).unwrap_or(today);
            previous_weekday(date)
        };
        DateSuggestions {
            one_month: months_back(1),
            three_months: months_back(3),
            six_months: months_back(6),
        }
    }
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self::new(12)
    }
}

/// The user's calendar date, which is what the date bounds are relative to.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday to Friday.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Saturday → Friday (−1 day), Sunday → Friday (−2 days), weekdays unchanged.
pub fn previous_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}
