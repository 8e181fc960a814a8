// src/error.rs
// =============================================================================
// Error types shared by the fetcher, the sink and the crawl engine.
//
// Two families live here:
// - Fatal errors (Config, Authentication) stop the program before the crawl
//   gets going.
// - Per-resource errors (Transport, Status, Parse, Persist) are recorded in
//   the crawl report and the crawl moves on to the next resource.
//
// Rust concepts:
// - thiserror: derives Display/Error for an enum from #[error(...)] attributes
// - #[from]: lets the ? operator convert serde_json errors automatically
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// How a transport-level request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    /// Request timed out
    Timeout,
    /// Could not connect (refused, unreachable, DNS)
    Connect,
    /// TLS handshake or certificate problem
    Tls,
    /// Redirect loop
    TooManyRedirects,
    /// Anything else reqwest reports
    Other,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connection failed",
            Self::Tls => "TLS error",
            Self::TooManyRedirects => "too many redirects",
            Self::Other => "request failed",
        };
        f.write_str(label)
    }
}

/// Crawler error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service rejected our credentials (or we sent none).
    #[error("Authentication failed for {url}: HTTP {status}")]
    Authentication { url: String, status: u16 },

    /// Network or connection error.
    #[error("Request failed for {url} ({kind}): {message}")]
    Transport {
        url: String,
        kind: TransportFailure,
        message: String,
    },

    /// Non-success HTTP status.
    #[error("Failed to fetch {url}. Status code: {status}")]
    Status { url: String, status: u16 },

    /// Body is not valid JSON.
    #[error("Failed to parse JSON response for {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Could not write a document to the mirror.
    #[error("Failed to persist {path}: {message}")]
    Persist { path: String, message: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = Error::Status {
            url: "https://bmc/redfish/v1/Chassis/9".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://bmc/redfish/v1/Chassis/9. Status code: 404"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("password without username".to_string());
        assert_eq!(err.to_string(), "Configuration error: password without username");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
