//! The proxy: a registry of callable method bindings
//!
//! A [`Proxy`] groups bindings under one endpoint URL, one protocol
//! version (fixed at creation), and one credential pair. Methods are
//! registered by name and looked up by name -- there is no dynamic
//! attribute injection; [`Proxy::method`] is the one way to reach a
//! binding.
//!
//! Registering a name that already exists is a silent no-op: the original
//! binding, callback and request id included, stays in place. This is a
//! documented quirk of the protocol layer, not an error.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::binding::{MethodBinding, ResultCallback, DEFAULT_REQUEST_ID};
use crate::error::ProxyError;
use crate::transport::{Credentials, Transport};
use crate::version::ProtocolVersion;

/// Receives failures that must not propagate, such as a panic raised by a
/// user-supplied result callback.
///
/// The default sink is [`TracingSink`]; inject a custom one with
/// [`Proxy::with_error_sink`] to surface these failures elsewhere.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorSink: Send + Sync {
    /// Report a failure tied to `method` that was contained at a dispatch
    /// boundary.
    fn report(&self, method: &str, message: &str);
}

/// Default [`ErrorSink`] that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, method: &str, message: &str) {
        tracing::error!("result callback for '{method}' failed: {message}");
    }
}

/// Per-registration options: an async-mode result callback and/or a
/// custom request id.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::proxy::RegisterOptions;
///
/// let options = RegisterOptions::new()
///     .request_id("req-7")
///     .on_result(|result, request_id, error| {
///         println!("{request_id}: {result:?} {error:?}");
///     });
/// # let _ = options;
/// ```
#[derive(Default)]
pub struct RegisterOptions {
    on_result: Option<Arc<ResultCallback>>,
    request_id: Option<String>,
}

impl RegisterOptions {
    /// Empty options: sync mode, default request id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver results through `callback` instead of returning them,
    /// switching the binding to async mode.
    pub fn on_result(
        mut self,
        callback: impl Fn(Option<serde_json::Value>, &str, Option<ProxyError>)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.on_result = Some(Arc::new(callback));
        self
    }

    /// Use `request_id` instead of the default `"jsonRequest"`.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl std::fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("async_mode", &self.on_result.is_some())
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// A registry of [`MethodBinding`]s sharing one URL, protocol version,
/// and credential pair.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use jsonrpc_proxy::codec::Value;
/// use jsonrpc_proxy::transport::http::HttpTransport;
/// use jsonrpc_proxy::{ProtocolVersion, Proxy};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let mut proxy = Proxy::with_version(
///     url::Url::parse("http://localhost/rpc")?,
///     ProtocolVersion::V1_0,
///     Arc::new(HttpTransport::new()),
/// );
/// proxy.set_credentials("alice", "s3cret");
/// proxy.register("echo");
///
/// let echo = proxy.method("echo").unwrap();
/// let result = echo.call(vec![Value::from(1), Value::from(2)]).await?;
/// println!("{result:?}");
/// # Ok(())
/// # }
/// ```
pub struct Proxy {
    /// Endpoint all bindings post to.
    url: Url,
    /// Protocol version, fixed at creation.
    version: ProtocolVersion,
    /// Credential pair copied to bindings at registration and on
    /// [`Proxy::set_credentials`].
    credentials: Option<Credentials>,
    /// Registered bindings, keyed by method name.
    bindings: HashMap<String, Arc<MethodBinding>>,
    /// Transport shared by every binding.
    transport: Arc<dyn Transport>,
    /// Sink shared by every binding.
    error_sink: Arc<dyn ErrorSink>,
}

impl std::fmt::Debug for Proxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("url", &self.url.as_str())
            .field("version", &self.version)
            .field("methods", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

impl Proxy {
    /// Create a proxy speaking the default protocol version (2.0).
    pub fn new(url: Url, transport: Arc<dyn Transport>) -> Self {
        Self::with_version(url, ProtocolVersion::default(), transport)
    }

    /// Create a proxy with an explicit protocol version.
    ///
    /// The version is fixed for the proxy's lifetime; every binding
    /// registered later copies it.
    pub fn with_version(
        url: Url,
        version: ProtocolVersion,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            url,
            version,
            credentials: None,
            bindings: HashMap::new(),
            transport,
            error_sink: Arc::new(TracingSink),
        }
    }

    /// Replace the error sink used by bindings registered from now on.
    pub fn with_error_sink(mut self, error_sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = error_sink;
        self
    }

    /// The endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The protocol version, as fixed at creation.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// The proxy-level credential pair, if set.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.clone()
    }

    /// Register a sync-mode method with the default request id.
    ///
    /// Shorthand for [`Proxy::register_with`] and empty options.
    pub fn register(&mut self, name: &str) {
        self.register_with(name, RegisterOptions::new());
    }

    /// Register a method with explicit options.
    ///
    /// The new binding copies the proxy's version and current
    /// credentials. If `name` is already registered this does nothing --
    /// the existing binding keeps its configuration, callback included.
    pub fn register_with(&mut self, name: &str, options: RegisterOptions) {
        if self.bindings.contains_key(name) {
            tracing::debug!("method '{name}' already registered; keeping the existing binding");
            return;
        }

        let binding = MethodBinding::new(
            name.to_string(),
            options
                .request_id
                .unwrap_or_else(|| DEFAULT_REQUEST_ID.to_string()),
            self.version,
            self.url.clone(),
            self.credentials.clone(),
            options.on_result,
            Arc::clone(&self.transport),
            Arc::clone(&self.error_sink),
        );

        self.bindings.insert(name.to_string(), Arc::new(binding));
    }

    /// Look up the binding registered under `name`.
    pub fn method(&self, name: &str) -> Option<Arc<MethodBinding>> {
        self.bindings.get(name).cloned()
    }

    /// Names of every registered method, in no particular order.
    pub fn method_names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    /// Store a credential pair and broadcast it to every registered
    /// binding.
    ///
    /// Requests already in flight keep the credentials they were sent
    /// with; bindings registered after this call pick the pair up at
    /// registration time.
    pub fn set_credentials(&mut self, user: &str, password: &str) {
        let credentials = Credentials::new(user, password);
        self.credentials = Some(credentials.clone());
        for binding in self.bindings.values() {
            binding.set_credentials(Some(credentials.clone()));
        }
    }
}
