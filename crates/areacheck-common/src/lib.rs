//! AreaCheck Common Types and Transport
//!
//! This crate provides the protocol definitions shared by every AreaCheck
//! component.
//!
//! # Overview
//!
//! AreaCheck answers one question: does the point `(x, y)` fall inside a
//! composite shape of size `r`? Clients POST coordinates to `/api/check` and
//! receive the verdict together with the recent query history. This crate
//! contains the pieces both sides of that exchange agree on:
//!
//! - **Protocol Layer**: the minimal JSON codec, evaluation records, reply
//!   envelopes and the error type
//! - **Transport Layer**: HTTP reply construction and route constants
//!
//! # Example
//!
//! ```
//! use areacheck_common::{decode_flat, encode, error_envelope};
//!
//! let fields = decode_flat(r#"{"x":"1","y":"-1","r":"2"}"#);
//! assert_eq!(fields["r"], "2");
//!
//! let reply = encode(&error_envelope("R out of range [1;4]"));
//! assert_eq!(reply, r#"{"ok":false,"error":"R out of range [1;4]"}"#);
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
