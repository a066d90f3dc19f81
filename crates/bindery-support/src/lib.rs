//! # Bindery value codecs
//!
//! Pure, stateless text codecs for the primitive values the binding engine
//! writes into XML and JSON documents. Every codec is a pair of functions,
//! `encode_*` producing the canonical lexical form and `decode_*` parsing it
//! back, and every pair is an exact inverse over the values it accepts.
//!
//! | Value | Lexical form |
//! |-------|--------------|
//! | bytes (base64) | RFC 4648 standard alphabet with padding |
//! | bytes (hex) | uppercase hexadecimal |
//! | date-time | RFC 3339 (`2024-03-01T10:15:00Z`) |
//! | date | `YYYY-MM-DD` |
//! | time | `HH:MM:SS[.fff]` |
//! | qualified name | Clark notation (`{urn:example}item`) |
//! | boolean | `true` / `false` (decode also accepts `1` / `0`) |
//!
//! The engine layers kind dispatch and error context on top of these
//! functions; nothing here knows about mapping descriptors.

pub mod binary;
pub mod error;
pub mod lexical;
pub mod qname;
pub mod temporal;

pub use binary::{decode_base64, decode_base64_url, decode_hex, encode_base64, encode_base64_url, encode_hex};
pub use error::{CodecError, Result};
pub use lexical::{decode_bool, decode_decimal, decode_float, decode_integer, encode_bool, encode_decimal, encode_float, encode_integer};
pub use qname::QName;
pub use temporal::{decode_date, decode_datetime, decode_time, encode_date, encode_datetime, encode_time};
