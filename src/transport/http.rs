//! HTTP transport built on `reqwest`
//!
//! Every call or notification becomes a single HTTP POST with
//! `Content-Type: application/json`. Credentials, when present, are sent
//! as HTTP Basic auth. A non-2xx status is returned to the caller inside
//! [`TransportResponse`] rather than treated as an error here -- the
//! protocol layer owns status interpretation.

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::{ProxyError, Result};
use crate::transport::{Credentials, Transport, TransportResponse};

/// Default per-request timeout when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `reqwest`-backed [`Transport`] implementation.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::transport::http::HttpTransport;
///
/// let transport = HttpTransport::new();
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    /// Underlying reqwest HTTP client.
    http_client: reqwest::Client,
    /// Static extra headers merged into every request (e.g. Authorization).
    headers: HashMap<String, String>,
}

impl HttpTransport {
    /// Construct a transport with the default per-request timeout.
    ///
    /// No network I/O is performed at construction time.
    pub fn new() -> Self {
        Self::with_config(HashMap::new(), DEFAULT_TIMEOUT)
    }

    /// Construct a transport with extra headers and an explicit timeout.
    ///
    /// The `headers` map is merged into every outbound request; callers
    /// should inject bearer tokens or API keys here. The `timeout` applies
    /// to each individual HTTP request.
    ///
    /// # Arguments
    ///
    /// * `headers` - Extra headers added to every request.
    /// * `timeout` - Per-request timeout.
    pub fn with_config(headers: HashMap<String, String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            // Default reqwest client construction cannot fail unless TLS
            // initialisation fails, which is a fatal startup condition on
            // any supported platform.
            .expect("failed to build reqwest client");

        Self {
            http_client,
            headers,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    /// POST the envelope and return the raw status/body pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the request cannot be sent or the
    /// body cannot be read; an HTTP error status is returned to the caller
    /// inside the [`TransportResponse`].
    async fn post(
        &self,
        url: &Url,
        credentials: Option<&Credentials>,
        body: String,
    ) -> Result<TransportResponse> {
        let mut request = self
            .http_client
            .post(url.as_str())
            .header("Content-Type", "application/json");

        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.password));
        }

        let response = request.body(body).send().await.map_err(ProxyError::Http)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ProxyError::Http)?;

        tracing::debug!("POST {url} -> HTTP {status}, {} body bytes", body.len());

        Ok(TransportResponse { status, body })
    }
}
