//! AreaCheck Server
//!
//! This crate provides the hit-test service: the geometry predicates, the
//! bounded query history, the request handler that ties them together and the
//! hyper HTTP server that exposes it.
//!
//! # Components
//!
//! - [`geometry`] - region predicates and their union
//! - [`history`] - shared, bounded, newest-first ledger of evaluations
//! - [`handler`] - routing, validation and reply envelopes
//! - [`http_server`] - HTTP/1.1 transport in front of the handler
//! - [`config`] - server settings and the fixed-timezone timestamp format

pub mod config;
pub mod geometry;
pub mod handler;
pub mod history;
pub mod http_server;

pub use config::{ServerConfig, TimestampFormat};
pub use handler::{DispatchRequest, HandlerError, RequestHandler};
pub use history::{HistoryLedger, MAX_HISTORY};
pub use http_server::HttpServer;
