//! Method bindings: locally callable handles for remote procedures
//!
//! A [`MethodBinding`] is created by [`crate::proxy::Proxy::register`] and
//! holds everything one remote procedure needs: its name, the request id
//! echoed by 2.0 servers, the protocol version copied from the proxy at
//! registration time, the current credential pair, and an optional result
//! callback.
//!
//! The callback's presence selects the call mode for the binding's whole
//! life: without one, [`MethodBinding::call`] awaits the exchange and
//! returns the decoded result; with one, `call` returns immediately and a
//! spawned task delivers `(result, request_id, error)` to the callback.
//! Both modes share one response-interpretation ladder, and
//! [`MethodBinding::notify`] bypasses it entirely.

use std::sync::{Arc, RwLock};

use url::Url;

use crate::codec::Value;
use crate::error::{ProxyError, Result};
use crate::proxy::ErrorSink;
use crate::transport::{Credentials, Transport, TransportResponse};
use crate::version::{build_envelope, ErrorObject, Params, ProtocolVersion};

/// Request id used when none is supplied at registration.
pub const DEFAULT_REQUEST_ID: &str = "jsonRequest";

/// Callback invoked with `(result, request_id, error)` when an async-mode
/// call completes.
///
/// Exactly one of `result` and `error` is `Some`. A panic raised inside
/// the callback is caught at the dispatch boundary and routed to the
/// proxy's [`ErrorSink`]; it never unwinds into the transport path.
pub type ResultCallback =
    dyn Fn(Option<serde_json::Value>, &str, Option<ProxyError>) + Send + Sync;

/// A locally callable handle for one remote procedure.
pub struct MethodBinding {
    /// The remote procedure name, as sent in the `method` member.
    method_name: String,
    /// The id sent with every call and checked against 2.0 responses.
    request_id: String,
    /// Protocol version, copied from the proxy at registration time.
    version: ProtocolVersion,
    /// Endpoint URL, shared with the owning proxy.
    url: Url,
    /// Current credential pair; overwritten by proxy-level broadcasts.
    credentials: RwLock<Option<Credentials>>,
    /// Async-mode completion callback; `None` selects sync mode.
    on_result: Option<Arc<ResultCallback>>,
    /// Transport collaborator shared across the proxy's bindings.
    transport: Arc<dyn Transport>,
    /// Sink for failures raised inside the user callback.
    error_sink: Arc<dyn ErrorSink>,
}

impl std::fmt::Debug for MethodBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodBinding")
            .field("method_name", &self.method_name)
            .field("request_id", &self.request_id)
            .field("version", &self.version)
            .field("async_mode", &self.on_result.is_some())
            .finish_non_exhaustive()
    }
}

impl MethodBinding {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        method_name: String,
        request_id: String,
        version: ProtocolVersion,
        url: Url,
        credentials: Option<Credentials>,
        on_result: Option<Arc<ResultCallback>>,
        transport: Arc<dyn Transport>,
        error_sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            method_name,
            request_id,
            version,
            url,
            credentials: RwLock::new(credentials),
            on_result,
            transport,
            error_sink,
        }
    }

    /// The remote procedure name this binding invokes.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The request id sent with every call.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The protocol version this binding speaks.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Whether this binding delivers results through a callback.
    pub fn is_async(&self) -> bool {
        self.on_result.is_some()
    }

    /// The credential pair currently attached to outbound requests.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().unwrap().clone()
    }

    pub(crate) fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.write().unwrap() = credentials;
    }

    /// Invoke the remote procedure.
    ///
    /// Sync mode (no callback registered): awaits the full exchange and
    /// returns `Ok(Some(result))`, or the first error from the response
    /// ladder (transport status, empty body, parse failure, server error,
    /// 2.0 id mismatch).
    ///
    /// Async mode (callback registered): returns `Ok(None)` immediately;
    /// a spawned task performs the exchange and hands
    /// `(result, request_id, error)` to the callback. Errors never reach
    /// the returned `Result` in this mode.
    ///
    /// Parameter encoding follows the per-call rule: under 2.0 a single
    /// object argument is passed through as named params; everything else
    /// is positional.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use jsonrpc_proxy::codec::Value;
    /// use jsonrpc_proxy::transport::http::HttpTransport;
    /// use jsonrpc_proxy::Proxy;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let mut proxy = Proxy::new(
    ///     url::Url::parse("http://localhost/rpc")?,
    ///     Arc::new(HttpTransport::new()),
    /// );
    /// proxy.register("add");
    /// let binding = proxy.method("add").unwrap();
    /// let sum = binding.call(vec![Value::from(1), Value::from(2)]).await?;
    /// println!("{sum:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(&self, args: Vec<Value>) -> Result<Option<serde_json::Value>> {
        let body = self.build_request(Some(self.request_id.as_str()), args);

        match &self.on_result {
            None => {
                let result = self.dispatch(body).await?;
                Ok(Some(result))
            }
            Some(callback) => {
                let transport = Arc::clone(&self.transport);
                let url = self.url.clone();
                let credentials = self.credentials();
                let version = self.version;
                let request_id = self.request_id.clone();
                let method_name = self.method_name.clone();
                let callback = Arc::clone(callback);
                let sink = Arc::clone(&self.error_sink);

                tokio::spawn(async move {
                    let outcome = exchange(
                        transport.as_ref(),
                        &url,
                        credentials.as_ref(),
                        body,
                        version,
                        &request_id,
                    )
                    .await;
                    let (result, error) = match outcome {
                        Ok(value) => (Some(value), None),
                        Err(e) => (None, Some(e)),
                    };
                    deliver(&*callback, result, &request_id, error, &method_name, sink.as_ref());
                });

                Ok(None)
            }
        }
    }

    /// Fire-and-forget notification.
    ///
    /// Builds a request with a null id and sends it from a spawned task.
    /// The response is never interpreted -- not its status, not its body
    /// -- and the binding's callback, if any, is never invoked. A send
    /// failure is logged at debug level and otherwise dropped.
    pub fn notify(&self, args: Vec<Value>) {
        let body = self.build_request(None, args);
        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let credentials = self.credentials();
        let method_name = self.method_name.clone();

        tokio::spawn(async move {
            if let Err(e) = transport.post(&url, credentials.as_ref(), body).await {
                tracing::debug!("notify '{method_name}' send failed: {e}");
            }
        });
    }

    fn build_request(&self, request_id: Option<&str>, args: Vec<Value>) -> String {
        let params = Params::classify(self.version, args);
        build_envelope(self.version, request_id, &self.method_name, &params)
    }

    async fn dispatch(
        &self,
        body: String,
    ) -> std::result::Result<serde_json::Value, ProxyError> {
        let credentials = self.credentials();
        exchange(
            self.transport.as_ref(),
            &self.url,
            credentials.as_ref(),
            body,
            self.version,
            &self.request_id,
        )
        .await
    }
}

/// Send one envelope and run the response through the interpretation
/// ladder. Shared by sync calls and the async-mode task.
async fn exchange(
    transport: &dyn Transport,
    url: &Url,
    credentials: Option<&Credentials>,
    body: String,
    version: ProtocolVersion,
    request_id: &str,
) -> std::result::Result<serde_json::Value, ProxyError> {
    let response = transport
        .post(url, credentials, body)
        .await
        .map_err(|e| match e.downcast::<ProxyError>() {
            Ok(proxy_error) => proxy_error,
            Err(other) => ProxyError::Send(other.to_string()),
        })?;

    interpret_response(version, request_id, response)
}

/// Interpret one transport response per the version's rules.
///
/// The ladder: non-200 status, then empty body, then parse, then the
/// version-specific error member, then (2.0 only) the request/response
/// identity check. Only a response that clears every rung yields its
/// `result` member.
fn interpret_response(
    version: ProtocolVersion,
    request_id: &str,
    response: TransportResponse,
) -> std::result::Result<serde_json::Value, ProxyError> {
    if response.status != 200 {
        return Err(ProxyError::Transport {
            status: response.status,
        });
    }

    if response.body.is_empty() {
        return Err(ProxyError::EmptyResponse);
    }

    let decoded = crate::codec::decode(&response.body)?;

    if let Some(error_value) = decoded.get("error").filter(|e| !e.is_null()) {
        // 1.0/1.1 carry a flat error value; 2.0 wraps code/message/data.
        let message = if version.is_legacy() {
            match error_value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }
        } else {
            match serde_json::from_value::<ErrorObject>(error_value.clone()) {
                Ok(error) => error.message,
                Err(_) => error_value.to_string(),
            }
        };
        return Err(ProxyError::Server { message });
    }

    if version == ProtocolVersion::V2_0 {
        let id = decoded.get("id").cloned().unwrap_or(serde_json::Value::Null);
        if id.as_str() != Some(request_id) {
            return Err(ProxyError::IdMismatch {
                expected: request_id.to_string(),
                got: match id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
            });
        }
    }

    Ok(decoded
        .get("result")
        .cloned()
        .unwrap_or(serde_json::Value::Null))
}

/// Hand the outcome to the user callback, containing any panic it raises.
fn deliver(
    callback: &ResultCallback,
    result: Option<serde_json::Value>,
    request_id: &str,
    error: Option<ProxyError>,
    method_name: &str,
    sink: &dyn ErrorSink,
) {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        callback(result, request_id, error)
    }));

    if let Err(panic) = outcome {
        sink.report(method_name, &panic_text(panic));
    }
}

fn panic_text(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
