use thiserror::Error;

/// Unified error type for the entire portfolio-calc-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input validation ────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Allocation must total 100% (got {total:.2}%)")]
    AllocationSum { total: f64 },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider registered: {0}")]
    NoProvider(String),

    #[error("Price not available for {symbol} on {date}")]
    PriceNotAvailable { symbol: String, date: String },

    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: f64 },

    #[error("Lookup for {symbol} failed: {source}")]
    Lookup {
        symbol: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Calculation timed out after {0}s")]
    Timeout(u64),

    // ── History store ───────────────────────────────────────────────
    #[error("History record not found: {0}")]
    HistoryNotFound(i64),

    #[error("History store error: {0}")]
    Persistence(String),

    // ── Serialization / File ────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Wrap a per-holding failure so the message names the offending symbol.
    pub fn lookup(symbol: &str, source: CoreError) -> Self {
        CoreError::Lookup {
            symbol: symbol.to_string(),
            source: Box::new(source),
        }
    }

    /// True for errors raised before any network call was issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_) | CoreError::AllocationSum { .. }
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; strip the query so API keys
        // never end up in messages or logs.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Replace everything after the first `?` with a placeholder.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
