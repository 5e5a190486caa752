//! HTTP Transport Utilities
//!
//! This module provides the HTTP-specific pieces shared by the AreaCheck server
//! and client.
//!
//! # Architecture
//!
//! Every AreaCheck reply goes out with the same preamble: status `200 OK` and
//! `Content-Type: application/json; charset=UTF-8`. Failures are reported only
//! inside the JSON envelope, never through the status code.
//!
//! # Components
//!
//! - **[`HttpTransport`]**: Utility functions for building replies and request bodies
//! - **[`HyperRequest`]**: Type alias for Hyper incoming requests
//! - **[`HyperResponse`]**: Type alias for Hyper responses
//!
//! # Example
//!
//! ```
//! use areacheck_common::protocol::error_envelope;
//! use areacheck_common::transport::http::HttpTransport;
//!
//! let response = HttpTransport::to_http_response(&error_envelope("Unknown endpoint: /"));
//! assert_eq!(response.status(), hyper::StatusCode::OK);
//! ```

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response};

use crate::protocol::{encode, JsonMap, JsonValue};

/// Type alias for Hyper incoming requests
pub type HyperRequest = Request<Incoming>;

/// Type alias for Hyper responses with full body
pub type HyperResponse = Response<Full<Bytes>>;

/// Content type attached to every reply
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Route that evaluates a point
pub const CHECK_ROUTE: &str = "/api/check";

/// Route that empties the history
pub const CLEAR_ROUTE: &str = "/api/clear";

/// HTTP transport utility functions
pub struct HttpTransport;

impl HttpTransport {
    /// Create an HTTP response from a reply envelope
    ///
    /// The status is always `200 OK`.
    pub fn to_http_response(envelope: &JsonValue) -> HyperResponse {
        Self::to_http_response_raw(encode(envelope))
    }

    /// Create an HTTP response from already encoded JSON text
    pub fn to_http_response_raw(body: String) -> HyperResponse {
        let mut response = Response::new(Full::new(Bytes::from(body)));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        response
    }

    /// Build the body of a check request
    ///
    /// Coordinates are sent as strings, the way browser forms submit them.
    ///
    /// # Example
    ///
    /// ```
    /// use areacheck_common::transport::http::HttpTransport;
    ///
    /// let body = HttpTransport::build_check_body("1", "-1", "2");
    /// assert_eq!(body, r#"{"x":"1","y":"-1","r":"2"}"#);
    /// ```
    pub fn build_check_body(x: &str, y: &str, r: &str) -> String {
        let body = JsonMap::new().with("x", x).with("y", y).with("r", r);
        encode(&body.into())
    }
}
