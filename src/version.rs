//! Protocol version policy and envelope construction
//!
//! This module is the pure mapping from a protocol version to its wire
//! envelope shape and its parameter-encoding rule. There are exactly three
//! envelope shapes:
//!
//! - `1.0`: `{"id": id, "method": name, "params": params}`
//! - `1.1`: `{"version": "1.1", "id": id, "method": name, "params": params}`
//! - `2.0`: `{"jsonrpc": "2.0", "id": id, "method": name, "params": params}`
//!
//! `params` is always an array or an object, never a bare scalar; the
//! positional-vs-named decision is made per call by [`Params::classify`]
//! and carried as an explicit two-variant tag rather than re-probed from
//! argument types downstream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{self, Value};
use crate::error::ProxyError;

/// A JSON-RPC protocol version.
///
/// Fixed at proxy creation; every binding registered on a proxy copies it
/// and keeps it for life.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::version::ProtocolVersion;
///
/// assert_eq!(ProtocolVersion::default(), ProtocolVersion::V2_0);
/// assert_eq!("1.1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1_1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// JSON-RPC 1.0: no version marker in the envelope.
    V1_0,
    /// JSON-RPC 1.1: `"version": "1.1"` marker.
    V1_1,
    /// JSON-RPC 2.0: `"jsonrpc": "2.0"` marker; named params and the
    /// structured error object are available.
    V2_0,
}

impl ProtocolVersion {
    /// Whether this is a pre-2.0 version (flat error values, positional
    /// params only).
    pub fn is_legacy(self) -> bool {
        matches!(self, ProtocolVersion::V1_0 | ProtocolVersion::V1_1)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        ProtocolVersion::V2_0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtocolVersion::V1_0 => "1.0",
            ProtocolVersion::V1_1 => "1.1",
            ProtocolVersion::V2_0 => "2.0",
        };
        f.write_str(s)
    }
}

impl FromStr for ProtocolVersion {
    type Err = ProxyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(ProtocolVersion::V1_0),
            "1.1" => Ok(ProtocolVersion::V1_1),
            "2.0" => Ok(ProtocolVersion::V2_0),
            other => Err(ProxyError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Call parameters, already classified as positional or named.
///
/// The variant is chosen once per call by [`Params::classify`]; everything
/// downstream (envelope construction, serialization) just matches on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// An ordered argument sequence, serialized as a JSON array.
    Positional(Vec<Value>),
    /// A single record argument passed through as a JSON object (2.0 only).
    Named(Vec<(String, Value)>),
}

impl Params {
    /// Classify an argument list for the given protocol version.
    ///
    /// Under 2.0, a single object argument becomes [`Params::Named`] and is
    /// passed through as the `params` object directly. Every other shape,
    /// and everything under 1.0/1.1, is positional: the arguments in order,
    /// a single object included.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonrpc_proxy::codec::Value;
    /// use jsonrpc_proxy::version::{Params, ProtocolVersion};
    ///
    /// let args = vec![Value::object([("a", Value::from(1))])];
    /// assert!(matches!(
    ///     Params::classify(ProtocolVersion::V2_0, args.clone()),
    ///     Params::Named(_)
    /// ));
    /// assert!(matches!(
    ///     Params::classify(ProtocolVersion::V1_0, args),
    ///     Params::Positional(_)
    /// ));
    /// ```
    pub fn classify(version: ProtocolVersion, mut args: Vec<Value>) -> Self {
        if version == ProtocolVersion::V2_0 && args.len() == 1 && args[0].is_object() {
            if let Value::Object(members) = args.remove(0) {
                return Params::Named(members);
            }
        }
        Params::Positional(args)
    }

    /// Serialize as the `params` member: an array or an object, never a
    /// bare scalar.
    pub fn encode(&self) -> String {
        match self {
            Params::Positional(items) => codec::encode(&Value::Array(items.clone())),
            Params::Named(members) => codec::encode(&Value::Object(members.clone())),
        }
    }
}

/// The structured error member of a JSON-RPC 2.0 response.
///
/// 1.0 and 1.1 responses carry a flat error value instead; this shape
/// exists only under 2.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Build the serialized request envelope for one call.
///
/// `request_id` is `None` for notifications, which serializes the `id`
/// member as `null`.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::codec::Value;
/// use jsonrpc_proxy::version::{build_envelope, Params, ProtocolVersion};
///
/// let params = Params::Positional(vec![Value::from(1), Value::from(2)]);
/// let envelope = build_envelope(ProtocolVersion::V1_0, Some("jsonRequest"), "add", &params);
/// assert_eq!(envelope, r#"{"id":"jsonRequest","method":"add","params":[1,2]}"#);
/// ```
pub fn build_envelope(
    version: ProtocolVersion,
    request_id: Option<&str>,
    method: &str,
    params: &Params,
) -> String {
    let id = match request_id {
        Some(id) => codec::encode(&Value::from(id)),
        None => "null".to_string(),
    };
    let method = codec::encode(&Value::from(method));
    let params = params.encode();

    match version {
        ProtocolVersion::V1_0 => {
            format!(r#"{{"id":{id},"method":{method},"params":{params}}}"#)
        }
        ProtocolVersion::V1_1 => {
            format!(r#"{{"version":"1.1","id":{id},"method":{method},"params":{params}}}"#)
        }
        ProtocolVersion::V2_0 => {
            format!(r#"{{"jsonrpc":"2.0","id":{id},"method":{method},"params":{params}}}"#)
        }
    }
}
