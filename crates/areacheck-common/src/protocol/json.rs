//! Minimal JSON Codec
//!
//! The wire format used by AreaCheck is a deliberately small subset of JSON.
//! Responses are built as a [`JsonValue`] tree and rendered with [`encode`];
//! request bodies are read with [`decode_flat`], a permissive parser that only
//! understands flat `{"key": value, ...}` objects.
//!
//! # Encoding rules
//!
//! - `null`, `true`/`false` and numbers are written in their native form
//! - strings are double-quoted; only `\` and `"` are escaped (each gets a
//!   preceding backslash), every other character is written verbatim
//! - mappings keep insertion order, sequences keep element order
//!
//! # Decoding rules
//!
//! The decoder splits the body on every `,` and each segment on its first `:`.
//! It has no notion of nesting, arrays or escaped characters, and it removes
//! every `"` it finds in a key or value. Request bodies are tiny and flat, and
//! callers rely on exactly this behavior for malformed input, so it must not be
//! upgraded to a full parser.
//!
//! # Example
//!
//! ```
//! use areacheck_common::protocol::json::{decode_flat, encode, JsonMap, JsonValue};
//!
//! let mut map = JsonMap::new();
//! map.insert("ok", true);
//! map.insert("error", "R out of range [1;4]");
//! assert_eq!(encode(&JsonValue::from(map)), r#"{"ok":true,"error":"R out of range [1;4]"}"#);
//!
//! let fields = decode_flat(r#"{"x":"1","y":-1}"#);
//! assert_eq!(fields["x"], "1");
//! assert_eq!(fields["y"], "-1");
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write};

/// Numeric payload of a [`JsonValue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonNumber {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNumber::Int(n) => write!(f, "{}", n),
            JsonNumber::UInt(n) => write!(f, "{}", n),
            JsonNumber::Float(n) if n.is_nan() => f.write_str("NaN"),
            JsonNumber::Float(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Debug keeps the fractional part ("1.0") and is round-trip exact.
            JsonNumber::Float(n) => write!(f, "{:?}", n),
        }
    }
}

/// Insertion-ordered mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonMap {
    entries: Vec<(String, JsonValue)>,
}

impl JsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, keeping its original position if it is already present.
    ///
    /// Returns the previous value for the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The value model the encoder understands.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    Mapping(JsonMap),
    Sequence(Vec<JsonValue>),
}

impl JsonValue {
    /// Wraps any displayable value as a string.
    ///
    /// This is the fallback for types that have no dedicated representation.
    pub fn from_display(value: &impl fmt::Display) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(JsonNumber::Int(value))
    }
}

impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        JsonValue::Number(JsonNumber::UInt(value))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(JsonNumber::Float(value))
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(value: JsonMap) -> Self {
        JsonValue::Mapping(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Sequence(value)
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(JsonValue::Null, Into::into)
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => write!(f, "{}", b),
            JsonValue::Number(n) => write!(f, "{}", n),
            JsonValue::String(s) => write_quoted(f, s),
            JsonValue::Mapping(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_quoted(f, key)?;
                    f.write_char(':')?;
                    write!(f, "{}", value)?;
                }
                f.write_char('}')
            }
            JsonValue::Sequence(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
        }
    }
}

fn write_quoted(out: &mut impl Write, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        if c == '\\' || c == '"' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    out.write_char('"')
}

/// Renders a value as compact JSON text.
pub fn encode(value: &JsonValue) -> String {
    value.to_string()
}

/// Flat key/value view of a request body.
pub type FlatMap = HashMap<String, String>;

/// Parses a flat `{"key": value, ...}` body into string pairs.
///
/// Segments without a `:` are skipped and later duplicates overwrite earlier
/// ones. Values are returned as text; numeric conversion is left to the caller.
pub fn decode_flat(body: &str) -> FlatMap {
    let mut fields = FlatMap::new();

    let mut inner = body.trim();
    if let Some(rest) = inner.strip_prefix('{') {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix('}') {
        inner = rest;
    }

    for segment in inner.split(',') {
        let Some((key, value)) = segment.split_once(':') else {
            continue;
        };
        fields.insert(strip_token(key), strip_token(value));
    }

    fields
}

fn strip_token(token: &str) -> String {
    token.trim().replace('"', "")
}
