//! Shared plumbing for the backend's JSON endpoints.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// HTTP client with a per-request timeout. Falls back to a default client if
/// the builder fails (it only does so when the TLS backend cannot load).
pub fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

/// Human-readable message for a failed response: the body's `detail` or
/// `error` field when present, otherwise `API Error: <status> - <reason>`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail.or(b.error))
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| serde_json::Value::Object(map).to_string()),
            other => other.to_string(),
        });

    from_body.unwrap_or_else(|| {
        format!(
            "API Error: {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    })
}

/// Pass 2xx responses through; turn anything else into `(status, message)`.
pub async fn check_status(resp: Response) -> Result<Response, (StatusCode, String)> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err((status, error_message(status, &body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_wins() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"detail":"Not found"}"#);
        assert_eq!(msg, "Not found");
    }

    #[test]
    fn error_field_used_when_no_detail() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error":"No data found"}"#);
        assert_eq!(msg, "No data found");
    }

    #[test]
    fn nested_error_object_uses_message() {
        let body = r#"{"error":{"code":"invalid_access_key","message":"You have not supplied a valid API Access Key."}}"#;
        let msg = error_message(StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "You have not supplied a valid API Access Key.");
    }

    #[test]
    fn falls_back_to_status_line() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(msg, "API Error: 500 - Internal Server Error");
    }
}
