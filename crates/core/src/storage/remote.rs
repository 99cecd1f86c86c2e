use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::CoreError;
use crate::http;
use crate::models::performance::PortfolioPerformance;
use super::traits::HistoryStore;

/// History store behind the backend's `/api/history` endpoints.
///
/// - `GET  /api/history`      → summaries, newest first
/// - `GET  /api/history/{id}` → one record with stocks, 404 if unknown
/// - `POST /api/history`      → `{"success": true, "id": n}`
pub struct RemoteHistoryStore {
    client: Client,
    base_url: String,
}

impl RemoteHistoryStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: http::build_client(timeout_secs),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/history{path}", self.base_url)
    }
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(default)]
    success: bool,
    id: Option<i64>,
}

/// Parse the create endpoint's reply into the assigned id.
pub fn parse_create_response(body: &str) -> Result<i64, CoreError> {
    let resp: CreateResponse = serde_json::from_str(body)
        .map_err(|e| CoreError::Persistence(format!("Malformed save response: {e}")))?;
    match (resp.success, resp.id) {
        (true, Some(id)) => Ok(id),
        _ => Err(CoreError::Persistence(
            "History store did not confirm the save".into(),
        )),
    }
}

/// Parse a history payload (one record or a list). Decode failures keep the
/// serde message, e.g. which field or timestamp was unreadable.
pub fn parse_history_body<T: DeserializeOwned>(body: &str) -> Result<T, CoreError> {
    serde_json::from_str(body)
        .map_err(|e| CoreError::Deserialization(format!("Malformed history response: {e}")))
}

fn persistence_error((status, message): (StatusCode, String)) -> CoreError {
    CoreError::Persistence(format!("{message} (HTTP {})", status.as_u16()))
}

#[async_trait]
impl HistoryStore for RemoteHistoryStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<PortfolioPerformance>, CoreError> {
        let resp = self.client.get(self.url("")).send().await?;
        let resp = http::check_status(resp).await.map_err(persistence_error)?;
        let body = resp.text().await?;
        parse_history_body(&body)
    }

    async fn get(&self, id: i64) -> Result<PortfolioPerformance, CoreError> {
        let resp = self.client.get(self.url(&format!("/{id}"))).send().await?;
        let resp = match http::check_status(resp).await {
            Ok(resp) => resp,
            Err((StatusCode::NOT_FOUND, _)) => return Err(CoreError::HistoryNotFound(id)),
            Err(e) => return Err(persistence_error(e)),
        };
        let body = resp.text().await?;
        parse_history_body(&body)
    }

    async fn create(
        &self,
        performance: &PortfolioPerformance,
    ) -> Result<PortfolioPerformance, CoreError> {
        let resp = self
            .client
            .post(self.url(""))
            .json(performance)
            .send()
            .await?;
        let resp = http::check_status(resp).await.map_err(persistence_error)?;
        let body = resp.text().await?;
        let id = parse_create_response(&body)?;
        Ok(performance.with_id(id))
    }
}
