//! Transport abstraction and implementations
//!
//! This module defines the [`Transport`] trait that carries serialized
//! request envelopes to the server. Concrete implementations live in
//! submodules:
//!
//! - [`http::HttpTransport`] -- `reqwest`-backed HTTP POST transport.
//! - [`fake::FakeTransport`] -- in-process fake used in tests (cfg(test)
//!   only).
//!
//! # Design
//!
//! The [`Transport`] trait is intentionally minimal: the protocol core
//! hands over a URL, the binding's current credentials, and the serialized
//! envelope, and gets back the HTTP-style status plus the raw response
//! body. Exactly one POST is issued per call or notification, and the body
//! is always sent as `Content-Type: application/json`. Connection pooling,
//! timeouts, retries, and TLS are entirely the transport's business --
//! this layer has no cancellation or timeout primitive of its own.

use url::Url;

use crate::error::Result;

/// A user/password pair attached to outbound requests.
///
/// Held by the proxy and broadcast to its bindings; transports decide how
/// to present it on the wire (the bundled [`http::HttpTransport`] uses
/// HTTP Basic auth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

/// The outcome of one POST exchange, as the protocol core sees it.
///
/// `status` is the numeric HTTP-style status; `body` is the raw response
/// text, possibly empty. Interpretation of both is the caller's job -- a
/// non-200 status is not a transport-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric HTTP-style status code.
    pub status: u16,
    /// Raw response body text, possibly empty.
    pub body: String,
}

/// Abstraction over request transports.
///
/// One implementation ships with the crate ([`http::HttpTransport`]); a
/// [`fake::FakeTransport`] is provided for tests. The trait is used
/// polymorphically through `Arc<dyn Transport>`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// POST a serialized request envelope and return the raw exchange
    /// outcome.
    ///
    /// Implementations MUST send `body` with the header
    /// `Content-Type: application/json` and MUST return the status and
    /// body without interpreting either; protocol-level handling (error
    /// members, id checks) happens in the caller.
    ///
    /// # Arguments
    ///
    /// * `url` - The endpoint to POST to.
    /// * `credentials` - Optional credential pair to attach.
    /// * `body` - The serialized request envelope.
    ///
    /// # Errors
    ///
    /// Returns an error only when the exchange itself fails (connection
    /// refused, channel closed); an HTTP error status is a successful
    /// exchange from the transport's point of view.
    async fn post(
        &self,
        url: &Url,
        credentials: Option<&Credentials>,
        body: String,
    ) -> Result<TransportResponse>;
}

pub mod http;

#[cfg(test)]
pub mod fake;
