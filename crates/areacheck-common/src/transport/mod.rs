//! AreaCheck Transport Layer
//!
//! HTTP helpers shared by the server and the client. The server side lives in
//! `areacheck-server`; this module only knows how a reply looks on the wire.

pub mod http;

pub use http::{HttpTransport, HyperRequest, HyperResponse, CHECK_ROUTE, CLEAR_ROUTE, JSON_CONTENT_TYPE};
