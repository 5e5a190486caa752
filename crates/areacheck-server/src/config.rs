//! Server configuration.

use areacheck_common::protocol::error::{AreaCheckError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::history::MAX_HISTORY;

/// Zone used for record timestamps unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

/// Layout of record timestamps: `YYYY-MM-DD HH:MM:SS`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default listen address.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Renders instants in one fixed timezone, independent of the host's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampFormat {
    zone: Tz,
    pattern: String,
}

impl TimestampFormat {
    /// Creates a format from a zone and a strftime pattern.
    ///
    /// Patterns chrono cannot render are rejected here rather than when a
    /// record is stamped.
    pub fn new(zone: Tz, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(AreaCheckError::InvalidConfig(format!(
                "Invalid timestamp pattern {:?}",
                pattern
            )));
        }
        Ok(Self { zone, pattern })
    }

    /// Looks up an IANA zone name such as `Europe/Moscow`.
    pub fn with_zone_name(name: &str) -> Result<Self> {
        let zone: Tz = name
            .parse()
            .map_err(|e| AreaCheckError::InvalidConfig(format!("Unknown timezone {}: {}", name, e)))?;
        Self::new(zone, DEFAULT_TIMESTAMP_FORMAT)
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.zone).format(&self.pattern).to_string()
    }

    pub fn now(&self) -> String {
        self.format(Utc::now())
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            zone: chrono_tz::Europe::Moscow,
            pattern: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Configuration for [`HttpServer`](crate::http_server::HttpServer).
///
/// # Example
///
/// ```
/// use areacheck_server::config::{ServerConfig, TimestampFormat};
///
/// let config = ServerConfig::default()
///     .with_bind("127.0.0.1:9000".parse().unwrap())
///     .with_history_capacity(50)
///     .with_timestamps(TimestampFormat::with_zone_name("UTC").unwrap());
/// assert_eq!(config.history_capacity, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
    /// Number of records kept in the history ledger
    pub history_capacity: usize,
    /// Timestamp rendering for new records
    pub timestamps: TimestampFormat,
}

impl ServerConfig {
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_timestamps(mut self, timestamps: TimestampFormat) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            history_capacity: MAX_HISTORY,
            timestamps: TimestampFormat::default(),
        }
    }
}
