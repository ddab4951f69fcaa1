//! Minimal JSON codec for the proxy wire format
//!
//! The encoder produces outbound request payloads with the escaping rules
//! the wire format requires: every code point below U+0020 or at U+0080 and
//! above is written as a `\uXXXX` escape (exactly four lower-case hex
//! digits, over UTF-16 code units), and timestamps are written as raw
//! epoch-millisecond numeric literals. `serde_json`'s encoder keeps
//! non-ASCII text verbatim, so the escaping is done by hand here.
//!
//! The decoder is the opposite story: response text comes from a network
//! peer and is untrusted, so it goes through `serde_json`'s strict parser
//! and nothing else. Malformed text fails with [`ProxyError::Parse`].

use chrono::{DateTime, Utc};

use crate::error::ProxyError;

/// An outbound JSON value.
///
/// This is the value model the encoder operates on. Object members keep
/// their insertion order, so key order is stable within one encode call.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::codec::{encode, Value};
///
/// let value = Value::Array(vec![Value::from(1), Value::from("a\nb")]);
/// assert_eq!(encode(&value), r#"[1,"a\nb"]"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The JSON `null` literal.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer numeric literal.
    Int(i64),
    /// A floating-point numeric literal.
    Float(f64),
    /// A string, escaped on encode.
    String(String),
    /// A point in time, encoded as its epoch-millisecond value (a bare
    /// numeric literal, not an ISO-8601 string).
    Timestamp(DateTime<Utc>),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A record with insertion-ordered members.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Build an object value from key/value pairs, preserving their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonrpc_proxy::codec::{encode, Value};
    ///
    /// let obj = Value::object([("a", Value::from(1)), ("b", Value::from(2))]);
    /// assert_eq!(encode(&obj), r#"{"a":1,"b":2}"#);
    /// ```
    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this value is an object (a record/map).
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// Encode a single value as JSON text.
///
/// Numbers and booleans use their `Display` form unquoted; timestamps
/// become their epoch-millisecond value; strings are escaped per
/// [`escape_string`].
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::codec::{encode, Value};
///
/// assert_eq!(encode(&Value::Null), "null");
/// assert_eq!(encode(&Value::from("a\nb")), r#""a\nb""#);
/// ```
pub fn encode(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => escape_string(s),
        Value::Timestamp(t) => t.timestamp_millis().to_string(),
        Value::Array(items) => encode_array(items),
        Value::Object(members) => encode_object(members),
    }
}

/// Encode an ordered sequence as a JSON array.
pub(crate) fn encode_array(items: &[Value]) -> String {
    let parts: Vec<String> = items.iter().map(encode).collect();
    format!("[{}]", parts.join(","))
}

/// Encode insertion-ordered members as a JSON object.
///
/// Null-valued members are emitted explicitly as `"key":null`.
pub(crate) fn encode_object(members: &[(String, Value)]) -> String {
    let parts: Vec<String> = members
        .iter()
        .map(|(key, value)| format!("{}:{}", escape_string(key), encode(value)))
        .collect();
    format!("{{{}}}", parts.join(","))
}

/// Escape and quote a string for the wire.
///
/// `"` and `\` are backslash-escaped; backspace, form feed, newline,
/// carriage return, and tab use their short escapes; every other UTF-16
/// code unit below 0x20 or at 0x80 and above becomes `\u` followed by
/// exactly four lower-case hex digits. Operating on UTF-16 code units
/// means characters outside the BMP come out as their surrogate pair,
/// each half a four-digit escape.
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for unit in s.encode_utf16() {
        match unit {
            0x22 => out.push_str("\\\""),
            0x5c => out.push_str("\\\\"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            0x0a => out.push_str("\\n"),
            0x0d => out.push_str("\\r"),
            0x09 => out.push_str("\\t"),
            u if u < 0x20 || u >= 0x80 => {
                out.push_str(&format!("\\u{u:04x}"));
            }
            u => out.push(u as u8 as char),
        }
    }
    out.push('"');
    out
}

/// Decode response text into a JSON value.
///
/// Response text originates from a network peer and is not trusted; it is
/// parsed strictly and never evaluated.
///
/// # Errors
///
/// Returns [`ProxyError::Parse`] if the text is not valid JSON.
///
/// # Examples
///
/// ```
/// use jsonrpc_proxy::codec::decode;
///
/// let value = decode(r#"{"result":42}"#).unwrap();
/// assert_eq!(value["result"], 42);
/// assert!(decode("not json").is_err());
/// ```
pub fn decode(text: &str) -> std::result::Result<serde_json::Value, ProxyError> {
    serde_json::from_str(text).map_err(ProxyError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_null() {
        assert_eq!(encode(&Value::Null), "null");
    }

    #[test]
    fn test_encode_booleans_and_numbers_unquoted() {
        assert_eq!(encode(&Value::Bool(true)), "true");
        assert_eq!(encode(&Value::Bool(false)), "false");
        assert_eq!(encode(&Value::Int(-7)), "-7");
        assert_eq!(encode(&Value::Float(1.5)), "1.5");
    }

    #[test]
    fn test_encode_plain_string() {
        assert_eq!(encode(&Value::from("hello")), r#""hello""#);
    }

    #[test]
    fn test_encode_newline_uses_short_escape() {
        assert_eq!(encode(&Value::from("a\nb")), r#""a\nb""#);
    }

    #[test]
    fn test_encode_all_short_escapes() {
        assert_eq!(
            encode(&Value::from("\u{8}\u{c}\n\r\t")),
            r#""\b\f\n\r\t""#
        );
    }

    #[test]
    fn test_encode_quote_and_backslash() {
        assert_eq!(encode(&Value::from(r#"say "hi"\now"#)), r#""say \"hi\"\\now""#);
    }

    #[test]
    fn test_encode_high_code_point_as_four_hex_digits() {
        // U+00C8 (LATIN CAPITAL LETTER E WITH GRAVE) is >= 0x80.
        assert_eq!(encode(&Value::from("\u{c8}")), "\"\\u00c8\"");
    }

    #[test]
    fn test_encode_control_char_as_four_hex_digits() {
        assert_eq!(encode(&Value::from("\u{1}")), "\"\\u0001\"");
    }

    #[test]
    fn test_encode_astral_char_as_surrogate_pair() {
        // U+1F600 encodes as the UTF-16 pair d83d/de00, four hex digits each.
        assert_eq!(encode(&Value::from("\u{1f600}")), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn test_escaping_law_no_raw_special_characters() {
        let input = "mixed: \"quoted\"\\, ctrl \u{2} and caf\u{e9} \u{1f980}";
        let encoded = encode(&Value::from(input));
        let inner = &encoded[1..encoded.len() - 1];
        // Raw quotes, control characters, and non-ASCII must never survive.
        for (i, c) in inner.char_indices() {
            assert!(
                (c as u32) >= 0x20 && (c as u32) < 0x80,
                "raw character {c:?} leaked at {i} in {encoded}"
            );
            if c == '"' {
                assert_eq!(&inner[i - 1..i], "\\", "unescaped quote in {encoded}");
            }
        }
    }

    #[test]
    fn test_encode_timestamp_as_epoch_millis() {
        let t = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(encode(&Value::Timestamp(t)), "1700000000123");
    }

    #[test]
    fn test_encode_array() {
        let value = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(encode(&value), "[1,2,3]");
    }

    #[test]
    fn test_encode_nested_array() {
        let value = Value::Array(vec![
            Value::from("x"),
            Value::Array(vec![Value::Bool(true), Value::Null]),
        ]);
        assert_eq!(encode(&value), r#"["x",[true,null]]"#);
    }

    #[test]
    fn test_encode_object_preserves_insertion_order() {
        let obj = Value::object([
            ("b", Value::from(2)),
            ("a", Value::from(1)),
            ("c", Value::from(3)),
        ]);
        assert_eq!(encode(&obj), r#"{"b":2,"a":1,"c":3}"#);
    }

    #[test]
    fn test_encode_object_emits_null_members_explicitly() {
        let obj = Value::object([("present", Value::from(1)), ("missing", Value::Null)]);
        assert_eq!(encode(&obj), r#"{"present":1,"missing":null}"#);
    }

    #[test]
    fn test_encode_object_escapes_keys() {
        let obj = Value::object([("we\nird", Value::from(1))]);
        assert_eq!(encode(&obj), r#"{"we\nird":1}"#);
    }

    #[test]
    fn test_decode_valid_json() {
        let value = decode(r#"{"jsonrpc":"2.0","id":"jsonRequest","result":42}"#).unwrap();
        assert_eq!(value["result"], 42);
        assert_eq!(value["id"], "jsonRequest");
    }

    #[test]
    fn test_decode_malformed_text_fails_with_parse_error() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, ProxyError::Parse(_)));
    }

    #[test]
    fn test_decode_rejects_executable_text() {
        // The decoder is a strict parser; script-like input is just invalid
        // JSON, never evaluated.
        assert!(decode("alert('x')").is_err());
        assert!(decode("1 + 1").is_err());
    }

    #[test]
    fn test_encoded_output_round_trips_through_decoder() {
        let obj = Value::object([
            ("name", Value::from("caf\u{e9}")),
            ("count", Value::from(3)),
            ("tags", Value::Array(vec![Value::from("a"), Value::from("b")])),
        ]);
        let decoded = decode(&encode(&obj)).unwrap();
        assert_eq!(decoded["name"], "caf\u{e9}");
        assert_eq!(decoded["count"], 3);
        assert_eq!(decoded["tags"][1], "b");
    }
}
