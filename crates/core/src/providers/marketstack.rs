use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::CoreError;
use crate::http;
use crate::models::price::{closest_to, PricePoint};
use crate::models::settings::ProviderKind;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://api.marketstack.com/v1";
const PROVIDER_NAME: &str = "Marketstack";

/// Days before a historical target that are searched for a bar.
const HISTORY_LOOKBEHIND_DAYS: i64 = 5;
/// Days of recent data searched for the latest close.
const LATEST_WINDOW_DAYS: i64 = 7;

/// Marketstack end-of-day API provider for stock prices.
///
/// - **Free tier**: ~12 months of history, 100 requests/month.
/// - **Requires**: API key (set via settings as "marketstack").
/// - **Strategy**: query a small window around the target and take the bar
///   whose date is nearest, so weekends and holidays still resolve.
pub struct MarketstackProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MarketstackProvider {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, BASE_URL, timeout_secs)
    }

    /// Point the provider at another host serving the same `/eod` API.
    pub fn with_base_url(api_key: String, base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: http::build_client(timeout_secs),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch EOD bars in `[from, to]`, newest first.
    async fn fetch_eod(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
        limit: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let symbols = symbol.to_uppercase();
        let date_from = from.format("%Y-%m-%d").to_string();
        let date_to = to.format("%Y-%m-%d").to_string();
        let limit = limit.to_string();

        let resp = self
            .client
            .get(format!("{}/eod", self.base_url))
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("symbols", symbols.as_str()),
                ("date_from", date_from.as_str()),
                ("date_to", date_to.as_str()),
                ("sort", "DESC"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let resp = http::check_status(resp)
            .await
            .map_err(|(_, message)| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message,
            })?;

        let body = resp.text().await?;
        parse_eod_response(&body, symbol)
    }
}

// ── Marketstack API response types ──────────────────────────────────

#[derive(Deserialize)]
struct EodResponse {
    data: Option<Vec<EodBar>>,
}

#[derive(Deserialize)]
struct EodBar {
    /// e.g. "2025-01-15T00:00:00+0000"
    date: String,
    close: Option<f64>,
}

/// Parse an EOD payload into price points, preserving the API's order.
/// Bars without a close or with an unreadable date are skipped.
pub fn parse_eod_response(body: &str, symbol: &str) -> Result<Vec<PricePoint>, CoreError> {
    let resp: EodResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Failed to parse EOD data for {symbol}: {e}"),
    })?;

    let points = resp
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|bar| {
            let day = bar.date.split('T').next()?;
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
            Some(PricePoint {
                date,
                price: bar.close?,
            })
        })
        .collect();

    Ok(points)
}

#[async_trait]
impl PriceProvider for MarketstackProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Marketstack
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let today = Utc::now().date_naive();
        let points = self
            .fetch_eod(symbol, today - Duration::days(LATEST_WINDOW_DAYS), today, 5)
            .await?;

        points
            .iter()
            .max_by_key(|p| p.date)
            .map(|p| p.price)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                date: "latest".to_string(),
            })
    }

    async fn get_historical_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let points = self
            .fetch_eod(
                symbol,
                date - Duration::days(HISTORY_LOOKBEHIND_DAYS),
                date + Duration::days(1),
                10,
            )
            .await?;

        closest_to(&points, date)
            .map(|p| p.price)
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                date: date.to_string(),
            })
    }
}
