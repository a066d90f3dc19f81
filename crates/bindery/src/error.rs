//! Error types for binding, marshalling and unmarshalling.
//!
//! Every failure the engine can report is a variant of [`BindError`]. The
//! engine does no I/O of its own, so nothing here is transient: errors are
//! returned to the caller as-is, never retried, and a failed call never yields
//! partial output.

use std::fmt;

use bindery_support::CodecError;
use thiserror::Error;

use crate::config::MediaType;
use crate::convert::ScalarKind;
use crate::descriptor::TypeKey;

/// A position inside the input text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Computes the line and column of a byte offset into `text`.
    ///
    /// Offsets past the end clamp to the last position.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in text.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type for all engine operations.
#[derive(Error, Debug)]
pub enum BindError {
    /// Bad metadata or configuration, detected while building a context.
    #[error("configuration error{}: {message}", scope(.type_key, .property))]
    Configuration {
        type_key: Option<TypeKey>,
        property: Option<String>,
        message: String,
    },

    /// A type was requested that was never bound to the context.
    #[error("unknown type: {type_key}")]
    UnknownType { type_key: TypeKey },

    /// Scalar text could not be decoded into its declared kind.
    #[error("cannot convert {raw_text:?} to {kind}{}: {source}", at(.property))]
    Conversion {
        kind: ScalarKind,
        raw_text: String,
        property: Option<String>,
        #[source]
        source: CodecError,
    },

    /// The input text is not well-formed.
    #[error("invalid {media_type} input at {location}: {message}")]
    Parse {
        media_type: MediaType,
        location: Location,
        message: String,
    },

    /// The shape of a value disagrees with the mapping of its property.
    #[error("property {property}: expected {expected}, found {found}")]
    SchemaMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The output writer failed.
    #[error("failed to render {media_type} output: {message}")]
    Render {
        media_type: MediaType,
        message: String,
    },
}

impl BindError {
    pub(crate) fn configuration(type_key: &TypeKey, message: impl Into<String>) -> Self {
        BindError::Configuration {
            type_key: Some(type_key.clone()),
            property: None,
            message: message.into(),
        }
    }

    pub(crate) fn property_configuration(
        type_key: &TypeKey,
        property: &str,
        message: impl Into<String>,
    ) -> Self {
        BindError::Configuration {
            type_key: Some(type_key.clone()),
            property: Some(property.to_string()),
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(
        property: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        BindError::SchemaMismatch {
            property: property.into(),
            expected,
            found,
        }
    }

    /// Attaches a property path to errors raised below the property level.
    pub(crate) fn at_property(self, path: &str) -> Self {
        match self {
            BindError::Conversion {
                kind,
                raw_text,
                property: None,
                source,
            } => BindError::Conversion {
                kind,
                raw_text,
                property: Some(path.to_string()),
                source,
            },
            BindError::SchemaMismatch {
                property,
                expected,
                found,
            } if property.is_empty() => BindError::SchemaMismatch {
                property: path.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}

fn scope(type_key: &Option<TypeKey>, property: &Option<String>) -> String {
    match (type_key, property) {
        (Some(t), Some(p)) => format!(" in {}.{}", t, p),
        (Some(t), None) => format!(" in {}", t),
        (None, Some(p)) => format!(" in property {}", p),
        (None, None) => String::new(),
    }
}

fn at(property: &Option<String>) -> String {
    property
        .as_deref()
        .map(|p| format!(" at property {}", p))
        .unwrap_or_default()
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_from_offset() {
        let text = "{\n  \"a\": 1,\n  x\n}";
        assert_eq!(Location::from_offset(text, 0), Location::new(1, 1));
        assert_eq!(Location::from_offset(text, 2), Location::new(2, 1));
        assert_eq!(Location::from_offset(text, 14), Location::new(3, 3));
        assert_eq!(Location::from_offset(text, 1000), Location::new(4, 2));
    }

    #[test]
    fn test_display_includes_context() {
        let err = BindError::Configuration {
            type_key: Some(TypeKey::new("Root")),
            property: Some("items".to_string()),
            message: "duplicate property name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "configuration error in Root.items: duplicate property name"
        );

        let err = BindError::mismatch("items", "collection", "scalar");
        assert_eq!(
            err.to_string(),
            "property items: expected collection, found scalar"
        );
    }

    #[test]
    fn test_at_property_fills_missing_path_only() {
        let err = BindError::mismatch("", "collection", "scalar").at_property("root/items");
        assert!(matches!(
            err,
            BindError::SchemaMismatch { ref property, .. } if property == "root/items"
        ));

        let err = BindError::mismatch("a", "collection", "scalar").at_property("b");
        assert!(matches!(
            err,
            BindError::SchemaMismatch { ref property, .. } if property == "a"
        ));
    }
}
