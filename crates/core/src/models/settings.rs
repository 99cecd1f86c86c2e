use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::i18n::Language;

/// Default address of the price/history backend.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Which price source answers historical/current lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// The backend's `/api/stock/price` proxy
    Backend,
    /// Marketstack EOD API, queried directly (API key required)
    Marketstack,
    /// Yahoo Finance, no key required
    Yahoo,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Backend => write!(f, "backend"),
            ProviderKind::Marketstack => write!(f, "marketstack"),
            ProviderKind::Yahoo => write!(f, "yahoo"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backend" => Ok(ProviderKind::Backend),
            "marketstack" => Ok(ProviderKind::Marketstack),
            "yahoo" => Ok(ProviderKind::Yahoo),
            other => Err(CoreError::Validation(format!(
                "Unknown price provider: {other}"
            ))),
        }
    }
}

/// Where calculation runs are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStoreKind {
    /// The backend's `/api/history` endpoints
    Remote,
    /// A local JSON file
    File,
    /// In-process only, lost on exit
    Memory,
}

impl fmt::Display for HistoryStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryStoreKind::Remote => write!(f, "remote"),
            HistoryStoreKind::File => write!(f, "file"),
            HistoryStoreKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for HistoryStoreKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(HistoryStoreKind::Remote),
            "file" => Ok(HistoryStoreKind::File),
            "memory" => Ok(HistoryStoreKind::Memory),
            other => Err(CoreError::Validation(format!(
                "Unknown history store: {other}"
            ))),
        }
    }
}

/// User-configurable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the backend serving `/api/stock/price` and `/api/history`.
    pub api_base_url: String,

    /// Price source used for every lookup.
    pub price_provider: ProviderKind,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "marketstack").
    pub api_keys: HashMap<String, String>,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,

    /// Upper bound for all lookups of one calculation. `None` disables it.
    pub calculation_timeout_secs: Option<u64>,

    pub history_store: HistoryStoreKind,

    /// Path of the JSON file used by `HistoryStoreKind::File`.
    pub history_file: String,

    /// How far back a start date may lie; the free price API keeps ~12 months.
    pub history_lookback_months: u32,

    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            price_provider: ProviderKind::Backend,
            api_keys: HashMap::new(),
            request_timeout_secs: 30,
            calculation_timeout_secs: None,
            history_store: HistoryStoreKind::Remote,
            history_file: "portfolio_history.json".to_string(),
            history_lookback_months: 12,
            language: Language::default(),
        }
    }
}

impl Settings {
    /// API key for a provider, if configured.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
