//! Binary-to-text codecs.
//!
//! Binary values never travel as raw bytes inside a document: XML and JSON
//! both carry them as base64 text (or hex for `xs:hexBinary` properties).

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

use crate::error::Result;

/// Encodes bytes as standard, padded base64.
///
/// The empty sequence encodes to the empty string.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard base64.
///
/// Whitespace is stripped first, since XML producers commonly wrap long
/// base64 runs across lines.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(strip_whitespace(text).as_bytes())?)
}

/// Encodes bytes as URL-safe, padded base64.
pub fn encode_base64_url(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

/// Decodes URL-safe base64.
pub fn decode_base64_url(text: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE.decode(strip_whitespace(text).as_bytes())?)
}

/// Encodes bytes as uppercase hexadecimal.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decodes hexadecimal in either case.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text.trim())?)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}
