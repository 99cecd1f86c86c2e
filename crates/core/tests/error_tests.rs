// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use portfolio_calc_core::errors::CoreError;
use std::error::Error;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn validation() {
        let err = CoreError::Validation("Client name cannot be empty".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Client name cannot be empty"
        );
    }

    #[test]
    fn allocation_sum_rounds_to_two_decimals() {
        let err = CoreError::AllocationSum { total: 99.456 };
        assert_eq!(err.to_string(), "Allocation must total 100% (got 99.46%)");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Backend".into(),
            message: "API Error: 500 - Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (Backend): API Error: 500 - Internal Server Error"
        );
    }

    #[test]
    fn price_not_available() {
        let err = CoreError::PriceNotAvailable {
            symbol: "AAPL".into(),
            date: "2025-01-15".into(),
        };
        assert_eq!(
            err.to_string(),
            "Price not available for AAPL on 2025-01-15"
        );
    }

    #[test]
    fn invalid_price() {
        let err = CoreError::InvalidPrice {
            symbol: "XYZ".into(),
            price: 0.0,
        };
        assert_eq!(err.to_string(), "Invalid price for XYZ: 0");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("marketstack".into());
        assert_eq!(
            err.to_string(),
            "No price provider registered: marketstack"
        );
    }

    #[test]
    fn timeout() {
        assert_eq!(
            CoreError::Timeout(20).to_string(),
            "Calculation timed out after 20s"
        );
    }

    #[test]
    fn history_not_found() {
        assert_eq!(
            CoreError::HistoryNotFound(42).to_string(),
            "History record not found: 42"
        );
    }

    #[test]
    fn persistence() {
        let err = CoreError::Persistence("disk full".into());
        assert_eq!(err.to_string(), "History store error: disk full");
    }
}

// ── Lookup wrapping ─────────────────────────────────────────────────

mod lookup {
    use super::*;

    #[test]
    fn names_symbol_and_cause() {
        let err = CoreError::lookup("MSFT", CoreError::Network("connection refused".into()));
        assert_eq!(
            err.to_string(),
            "Lookup for MSFT failed: Network error: connection refused"
        );
    }

    #[test]
    fn exposes_source() {
        let err = CoreError::lookup("MSFT", CoreError::Timeout(5));
        let source = err.source().expect("lookup error has a source");
        assert_eq!(source.to_string(), "Calculation timed out after 5s");
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn validation_errors() {
        assert!(CoreError::Validation("x".into()).is_validation());
        assert!(CoreError::AllocationSum { total: 90.0 }.is_validation());
    }

    #[test]
    fn lookup_errors_are_not_validation() {
        assert!(!CoreError::Network("x".into()).is_validation());
        assert!(!CoreError::Timeout(1).is_validation());
        assert!(!CoreError::HistoryNotFound(1).is_validation());
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("denied")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}
