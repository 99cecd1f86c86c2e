use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::errors::CoreError;
use crate::http;
use crate::models::settings::ProviderKind;
use super::traits::PriceProvider;

const PROVIDER_NAME: &str = "Backend";

/// Price lookups through the backend's `/api/stock/price` proxy.
///
/// - **Current**: `GET /api/stock/price?symbol=AAPL`
/// - **Historical**: `GET /api/stock/price?symbol=AAPL&date=2025-01-15`
///
/// The backend picks the trading day nearest to the requested date, so a
/// holiday still yields a price. Responses must carry a numeric `price`.
pub struct BackendPriceProvider {
    client: Client,
    base_url: String,
}

impl BackendPriceProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: http::build_client(timeout_secs),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/stock/price", self.base_url)
    }

    async fn fetch(&self, symbol: &str, date: Option<NaiveDate>) -> Result<f64, CoreError> {
        let mut query = vec![("symbol", symbol.to_uppercase())];
        if let Some(date) = date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }

        let resp = self.client.get(self.endpoint()).query(&query).send().await?;
        let resp = match http::check_status(resp).await {
            Ok(resp) => resp,
            Err((StatusCode::NOT_FOUND, _)) => {
                return Err(CoreError::PriceNotAvailable {
                    symbol: symbol.to_string(),
                    date: date.map_or_else(|| "latest".to_string(), |d| d.to_string()),
                })
            }
            Err((_, message)) => {
                return Err(CoreError::Api {
                    provider: PROVIDER_NAME.into(),
                    message,
                })
            }
        };

        let body = resp.text().await?;
        parse_price_response(&body, symbol, date)
    }
}

// ── Backend API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct PriceResponse {
    price: f64,
    #[allow(dead_code)]
    #[serde(default)]
    date: Option<String>,
}

/// Parse `{"price": number, "date": "..."}`. A missing or non-numeric
/// `price` is an error naming the symbol (and date, for historical lookups).
pub fn parse_price_response(
    body: &str,
    symbol: &str,
    date: Option<NaiveDate>,
) -> Result<f64, CoreError> {
    let parsed: PriceResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: match date {
            Some(d) => format!("Malformed price response for {symbol} near {d}: {e}"),
            None => format!("Malformed price response for {symbol}: {e}"),
        },
    })?;
    Ok(parsed.price)
}

#[async_trait]
impl PriceProvider for BackendPriceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Backend
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.fetch(symbol, None).await
    }

    async fn get_historical_price(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        self.fetch(symbol, Some(date)).await
    }
}
