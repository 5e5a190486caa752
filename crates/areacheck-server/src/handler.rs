//! Request Handler for AreaCheck
//!
//! This module turns one dispatched request into one reply envelope. It knows
//! nothing about sockets: the transport hands it a [`DispatchRequest`] (method,
//! content type, path fields, declared content length) plus a byte source for
//! the body, and gets back a [`JsonValue`] to emit with status 200.
//!
//! # Routing
//!
//! - `/api/clear...`: POST only, empties the history
//! - `/api/check...` or an empty route: POST + `application/json`, evaluates
//!   the point and records it
//! - anything else: `Unknown endpoint: <route>`
//!
//! # Failures
//!
//! Every failure becomes `{"ok":false,"error":"<message>"}` where the message
//! is the `Display` text of [`HandlerError`]. Nothing here is fatal to the
//! server.
//!
//! # Example
//!
//! ```
//! use areacheck_common::protocol::encode;
//! use areacheck_server::handler::{DispatchRequest, RequestHandler};
//! use areacheck_server::history::HistoryLedger;
//! use std::sync::Arc;
//!
//! let handler = RequestHandler::new(Arc::new(HistoryLedger::new()), Default::default());
//! let body = br#"{"x":"10","y":"0","r":"2"}"#;
//! let request = DispatchRequest::post("/api/check")
//!     .with_content_type("application/json")
//!     .with_content_length(body.len());
//!
//! let reply = encode(&handler.handle(&request, &body[..]));
//! assert_eq!(reply, r#"{"ok":false,"error":"X out of range [-3;3]"}"#);
//! ```

use areacheck_common::protocol::{
    check_envelope, cleared_envelope, decode_flat, error_envelope, EvaluationRecord, FlatMap, JsonValue,
};
use areacheck_common::transport::{CHECK_ROUTE, CLEAR_ROUTE};
use std::io::Read;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::config::TimestampFormat;
use crate::geometry::RegionHits;
use crate::history::HistoryLedger;

/// Accepted range for `x`.
pub const X_RANGE: RangeInclusive<f64> = -3.0..=3.0;
/// Accepted range for `y`.
pub const Y_RANGE: RangeInclusive<f64> = -3.0..=5.0;
/// Accepted range for `r`.
pub const R_RANGE: RangeInclusive<f64> = 1.0..=4.0;

/// Why a request was answered with an error envelope.
///
/// The `Display` text is the exact message sent to the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Method Not Allowed (use POST)")]
    MethodNotAllowed,

    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,

    #[error("X out of range [-3;3]")]
    XOutOfRange,

    #[error("Y out of range {{-3..5}}")]
    YOutOfRange,

    #[error("R out of range [1;4]")]
    ROutOfRange,

    #[error("Bad request: {0}")]
    MalformedInput(String),

    #[error("Unknown endpoint: {0}")]
    UnknownRoute(String),
}

/// Request metadata supplied by the transport.
///
/// The route is taken from the first non-empty of `script_name`, `path_info`
/// and `request_uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub method: String,
    pub content_type: String,
    pub script_name: String,
    pub path_info: String,
    pub request_uri: String,
    /// Declared body length; the handler never reads past it
    pub content_length: usize,
}

impl Default for DispatchRequest {
    fn default() -> Self {
        Self {
            method: "GET".into(),
            content_type: String::new(),
            script_name: String::new(),
            path_info: String::new(),
            request_uri: String::new(),
            content_length: 0,
        }
    }
}

impl DispatchRequest {
    /// A request with the given method and request target.
    pub fn new(method: impl Into<String>, request_uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            request_uri: request_uri.into(),
            ..Self::default()
        }
    }

    pub fn post(request_uri: impl Into<String>) -> Self {
        Self::new("POST", request_uri)
    }

    pub fn get(request_uri: impl Into<String>) -> Self {
        Self::new("GET", request_uri)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_content_length(mut self, content_length: usize) -> Self {
        self.content_length = content_length;
        self
    }

    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = script_name.into();
        self
    }

    pub fn with_path_info(mut self, path_info: impl Into<String>) -> Self {
        self.path_info = path_info.into();
        self
    }

    /// The route this request addresses.
    pub fn route(&self) -> &str {
        [&self.script_name, &self.path_info, &self.request_uri]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .map_or("", String::as_str)
    }

    fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }

    fn is_json(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("application/json")
    }
}

/// Parses a declared content length, defaulting to zero.
pub fn parse_content_length(value: Option<&str>) -> usize {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Endpoint a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Check,
    Clear,
    Unknown(&'a str),
}

impl<'a> Route<'a> {
    pub fn resolve(route: &'a str) -> Self {
        if route.starts_with(CLEAR_ROUTE) {
            Route::Clear
        } else if route.starts_with(CHECK_ROUTE) || route.is_empty() {
            Route::Check
        } else {
            Route::Unknown(route)
        }
    }
}

/// Handles AreaCheck requests against a shared history ledger.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    ledger: Arc<HistoryLedger>,
    timestamps: TimestampFormat,
}

impl RequestHandler {
    pub fn new(ledger: Arc<HistoryLedger>, timestamps: TimestampFormat) -> Self {
        Self { ledger, timestamps }
    }

    pub fn ledger(&self) -> &Arc<HistoryLedger> {
        &self.ledger
    }

    /// Handles one request and returns the reply envelope.
    ///
    /// `body` is read only for check requests, and at most
    /// `request.content_length` bytes are consumed from it.
    pub fn handle(&self, request: &DispatchRequest, body: impl Read) -> JsonValue {
        match self.dispatch(request, body) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Request to {:?} rejected: {}", request.route(), e);
                error_envelope(e.to_string())
            }
        }
    }

    fn dispatch(&self, request: &DispatchRequest, body: impl Read) -> Result<JsonValue, HandlerError> {
        match Route::resolve(request.route()) {
            Route::Clear => {
                if !request.is_post() {
                    return Err(HandlerError::MethodNotAllowed);
                }
                self.ledger.clear();
                tracing::info!("History cleared");
                Ok(cleared_envelope())
            }
            Route::Check => {
                let body = read_body(body, request.content_length);
                tracing::debug!(
                    "Check request: route={:?} method={} len={} body={}",
                    request.route(),
                    request.method,
                    request.content_length,
                    body
                );

                if !request.is_post() {
                    return Err(HandlerError::MethodNotAllowed);
                }
                if !request.is_json() {
                    return Err(HandlerError::UnsupportedMediaType);
                }
                self.check(&decode_flat(&body))
            }
            Route::Unknown(route) => Err(HandlerError::UnknownRoute(route.to_string())),
        }
    }

    /// Validates decoded fields, evaluates the point and records it.
    pub fn check(&self, fields: &FlatMap) -> Result<JsonValue, HandlerError> {
        let x = parse_coordinate(fields, "x")?;
        let y = parse_coordinate(fields, "y")?;
        let r = parse_coordinate(fields, "r")?;
        validate(x, y, r)?;

        let item = self.evaluate(x, y, r);
        let history = self.ledger.record_and_snapshot(item.clone());
        Ok(check_envelope(&item, &history))
    }

    /// Evaluates a point without recording it.
    pub fn evaluate(&self, x: f64, y: f64, r: f64) -> EvaluationRecord {
        let started = Instant::now();
        let hits = RegionHits::evaluate(x, y, r);
        let elapsed = started.elapsed();

        EvaluationRecord {
            timestamp: self.timestamps.now(),
            x,
            y,
            r,
            hit: hits.hit(),
            duration_ms: round_millis(elapsed.as_nanos()),
            debug_rect: hits.rect,
            debug_tri: hits.triangle,
            debug_circ: hits.circle,
        }
    }
}

/// Checks the inputs against the accepted ranges, `x` first.
///
/// NaN is outside every range, so it is rejected like any other
/// out-of-range value.
pub fn validate(x: f64, y: f64, r: f64) -> Result<(), HandlerError> {
    if !X_RANGE.contains(&x) {
        return Err(HandlerError::XOutOfRange);
    }
    if !Y_RANGE.contains(&y) {
        return Err(HandlerError::YOutOfRange);
    }
    if !R_RANGE.contains(&r) {
        return Err(HandlerError::ROutOfRange);
    }
    Ok(())
}

// Accepts Rust float syntax: `1`, `-0.5`, `1e-3`, `.5`, `inf`, `NaN`.
fn parse_coordinate(fields: &FlatMap, name: &str) -> Result<f64, HandlerError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| HandlerError::MalformedInput(format!("missing value for {}", name)))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| HandlerError::MalformedInput(format!("cannot parse {} from {:?}: {}", name, raw, e)))
}

fn read_body(source: impl Read, content_length: usize) -> String {
    let mut buf = Vec::new();
    // Bytes read before a failure are kept.
    if let Err(e) = source.take(content_length as u64).read_to_end(&mut buf) {
        tracing::debug!("Request body read stopped early after {} bytes: {}", buf.len(), e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn round_millis(nanos: u128) -> u64 {
    u64::try_from((nanos + 500_000) / 1_000_000).unwrap_or(u64::MAX)
}
