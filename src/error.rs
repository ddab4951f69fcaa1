//! Error types for jsonrpc-proxy
//!
//! This module defines all error types used throughout the library,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for jsonrpc-proxy operations
///
/// This enum encompasses every failure a call or notification can produce:
/// transport-level outcomes, response decoding failures, server-reported
/// errors, and the JSON-RPC 2.0 request/response identity check.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Non-200 HTTP-level outcome from the transport
    #[error("transport error: HTTP status {status}")]
    Transport {
        /// The HTTP status code returned by the transport
        status: u16,
    },

    /// HTTP 200 with an empty or absent response body
    #[error("the server responded with an empty document")]
    EmptyResponse,

    /// Response body is not valid JSON
    #[error("response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Decoded response carries a non-null error member
    #[error("server error: {message}")]
    Server {
        /// The error text extracted per the version-specific rule
        message: String,
    },

    /// JSON-RPC 2.0 response id does not match the originating request id
    #[error("response id {got:?} does not match request id {expected:?}")]
    IdMismatch {
        /// The request id this binding sent
        expected: String,
        /// The id the server echoed back
        got: String,
    },

    /// Transport-level send failure before any status was available
    #[error("send error: {0}")]
    Send(String),

    /// Protocol version string outside the supported 1.0 / 1.1 / 2.0 set
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for jsonrpc-proxy operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let error = ProxyError::Transport { status: 500 };
        assert_eq!(error.to_string(), "transport error: HTTP status 500");
    }

    #[test]
    fn test_empty_response_error_display() {
        let error = ProxyError::EmptyResponse;
        assert_eq!(
            error.to_string(),
            "the server responded with an empty document"
        );
    }

    #[test]
    fn test_server_error_display() {
        let error = ProxyError::Server {
            message: "method not found".to_string(),
        };
        assert_eq!(error.to_string(), "server error: method not found");
    }

    #[test]
    fn test_id_mismatch_error_display() {
        let error = ProxyError::IdMismatch {
            expected: "jsonRequest".to_string(),
            got: "other".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("jsonRequest"));
        assert!(s.contains("other"));
    }

    #[test]
    fn test_send_error_display() {
        let error = ProxyError::Send("connection refused".to_string());
        assert_eq!(error.to_string(), "send error: connection refused");
    }

    #[test]
    fn test_unsupported_version_error_display() {
        let error = ProxyError::UnsupportedVersion("3.0".to_string());
        assert_eq!(error.to_string(), "unsupported protocol version: 3.0");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: ProxyError = json_error.into();
        assert!(matches!(error, ProxyError::Parse(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProxyError>();
    }
}
