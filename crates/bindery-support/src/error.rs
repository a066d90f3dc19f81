//! Error type shared by all codecs.

use thiserror::Error;

/// Failure to decode a lexical value.
///
/// The caller owns the offending text; these variants only describe why it was
/// rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid date/time: {0}")]
    Temporal(#[from] chrono::ParseError),

    #[error("invalid number: {message}")]
    Number { message: String },

    #[error("invalid boolean")]
    Boolean,

    #[error("invalid qualified name: {reason}")]
    QName { reason: &'static str },

    /// Raised by user-supplied converters.
    #[error("{0}")]
    Custom(String),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
