//! jsonrpc-proxy - multi-version JSON-RPC client library
//!
//! This library turns named remote procedures into locally callable
//! handles, speaking JSON-RPC 1.0, 1.1, or 2.0 over a pluggable transport.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `proxy`: the registry of method bindings under one URL, version, and
//!   credential pair
//! - `binding`: per-method callable handles, call dispatch, and response
//!   interpretation
//! - `version`: protocol version policy -- envelope shapes and the
//!   positional/named parameter rule
//! - `codec`: the minimal JSON encoder for outbound values and the strict
//!   decoder for inbound response text
//! - `transport`: the transport contract and the bundled HTTP
//!   implementation
//! - `error`: error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use jsonrpc_proxy::codec::Value;
//! use jsonrpc_proxy::transport::http::HttpTransport;
//! use jsonrpc_proxy::Proxy;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut proxy = Proxy::new(
//!         url::Url::parse("http://localhost:8080/rpc")?,
//!         Arc::new(HttpTransport::new()),
//!     );
//!     proxy.register("add");
//!
//!     let add = proxy.method("add").unwrap();
//!     let sum = add
//!         .call(vec![Value::object([
//!             ("a", Value::from(1)),
//!             ("b", Value::from(2)),
//!         ])])
//!         .await?;
//!     println!("sum = {sum:?}");
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod codec;
pub mod error;
pub mod proxy;
pub mod transport;
pub mod version;

// Re-export commonly used types
pub use binding::{MethodBinding, ResultCallback, DEFAULT_REQUEST_ID};
pub use codec::Value;
pub use error::{ProxyError, Result};
pub use proxy::{ErrorSink, Proxy, RegisterOptions, TracingSink};
pub use transport::{http::HttpTransport, Credentials, Transport, TransportResponse};
pub use version::{ErrorObject, Params, ProtocolVersion};
