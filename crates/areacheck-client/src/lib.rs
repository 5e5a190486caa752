//! AreaCheck HTTP client.
//!
//! Talks to a running AreaCheck server over plain HTTP/1.1.
//!
//! # Example
//!
//! ```no_run
//! use areacheck_client::AreaCheckClient;
//!
//! #[tokio::main]
//! async fn main() -> areacheck_common::Result<()> {
//!     let client = AreaCheckClient::new("http://127.0.0.1:8080")?;
//!     let reply = client.check(1, -1, 2).await?;
//!     println!("hit: {}", reply.item.map(|item| item.hit).unwrap_or(false));
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::{parse_reply, AreaCheckClient, DEFAULT_TIMEOUT};
