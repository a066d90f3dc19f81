//! Value Converters: scalar values to and from text.
//!
//! The engine never puts raw bytes, numbers or dates into a node tree; every
//! scalar is turned into text here first (and parsed back on the way in).
//! [`encode`] and [`decode`] dispatch on the declared [`ScalarKind`] using the
//! codecs from `bindery-support`. A [`ConverterRegistry`] lets a binding
//! configuration replace the converter for individual kinds.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bindery_support::{self as codec, CodecError, QName};
use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};
use crate::value::Scalar;

/// The declared kind of a scalar property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Boolean,
    Integer,
    Float,
    Decimal,
    /// Bytes as base64 text.
    Binary,
    /// Bytes as hexadecimal text.
    HexBinary,
    DateTime,
    Date,
    Time,
    #[serde(rename = "qname")]
    QName,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Binary => "binary",
            ScalarKind::HexBinary => "hex_binary",
            ScalarKind::DateTime => "date_time",
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
            ScalarKind::QName => "qname",
        }
    }

    /// How the encoded text is written in JSON.
    pub fn text_style(&self) -> crate::node::TextStyle {
        use crate::node::TextStyle;
        match self {
            ScalarKind::Integer | ScalarKind::Float | ScalarKind::Decimal => TextStyle::Number,
            ScalarKind::Boolean => TextStyle::Boolean,
            _ => TextStyle::Quoted,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts one scalar kind to and from text.
///
/// Implementations must be pure: the same input always yields the same
/// output, and `decode(encode(v)) == v` for every value they accept.
pub trait ValueConverter: Send + Sync {
    /// Encodes a value, or returns `None` if the value's variant is not one
    /// this converter handles.
    fn encode(&self, value: &Scalar) -> Option<String>;

    fn decode(&self, text: &str) -> std::result::Result<Scalar, CodecError>;
}

/// The built-in converter for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardConverter(pub ScalarKind);

impl ValueConverter for StandardConverter {
    fn encode(&self, value: &Scalar) -> Option<String> {
        let text = match (self.0, value) {
            (ScalarKind::String, Scalar::String(s)) => s.clone(),
            (ScalarKind::Boolean, Scalar::Boolean(b)) => codec::encode_bool(*b).to_string(),
            (ScalarKind::Integer, Scalar::Integer(i)) => codec::encode_integer(*i),
            (ScalarKind::Float, Scalar::Float(f)) => codec::encode_float(*f),
            (ScalarKind::Float, Scalar::Integer(i)) => codec::encode_float(*i as f64),
            (ScalarKind::Decimal, Scalar::Decimal(d)) => codec::encode_decimal(d),
            (ScalarKind::Decimal, Scalar::Integer(i)) => codec::encode_integer(*i),
            (ScalarKind::Binary, Scalar::Bytes(b)) => codec::encode_base64(b),
            (ScalarKind::HexBinary, Scalar::Bytes(b)) => codec::encode_hex(b),
            (ScalarKind::DateTime, Scalar::DateTime(dt)) => codec::encode_datetime(dt),
            (ScalarKind::Date, Scalar::Date(d)) => codec::encode_date(d),
            (ScalarKind::Time, Scalar::Time(t)) => codec::encode_time(t),
            (ScalarKind::QName, Scalar::QName(q)) => q.encode(),
            _ => return None,
        };
        Some(text)
    }

    fn decode(&self, text: &str) -> std::result::Result<Scalar, CodecError> {
        Ok(match self.0 {
            ScalarKind::String => Scalar::String(text.to_string()),
            ScalarKind::Boolean => Scalar::Boolean(codec::decode_bool(text)?),
            ScalarKind::Integer => Scalar::Integer(codec::decode_integer(text)?),
            ScalarKind::Float => Scalar::Float(codec::decode_float(text)?),
            ScalarKind::Decimal => Scalar::Decimal(codec::decode_decimal(text)?),
            ScalarKind::Binary => Scalar::Bytes(codec::decode_base64(text)?),
            ScalarKind::HexBinary => Scalar::Bytes(codec::decode_hex(text)?),
            ScalarKind::DateTime => Scalar::DateTime(codec::decode_datetime(text)?),
            ScalarKind::Date => Scalar::Date(codec::decode_date(text)?),
            ScalarKind::Time => Scalar::Time(codec::decode_time(text)?),
            ScalarKind::QName => Scalar::QName(QName::decode(text)?),
        })
    }
}

/// Binary converter using the URL-safe base64 alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64UrlConverter;

impl ValueConverter for Base64UrlConverter {
    fn encode(&self, value: &Scalar) -> Option<String> {
        match value {
            Scalar::Bytes(b) => Some(codec::encode_base64_url(b)),
            _ => None,
        }
    }

    fn decode(&self, text: &str) -> std::result::Result<Scalar, CodecError> {
        Ok(Scalar::Bytes(codec::decode_base64_url(text)?))
    }
}

/// Encodes a scalar as text for its declared kind.
///
/// Fails with [`BindError::SchemaMismatch`] (without a property path) when the
/// value's variant does not fit the kind.
pub fn encode(value: &Scalar, kind: ScalarKind) -> Result<String> {
    StandardConverter(kind)
        .encode(value)
        .ok_or_else(|| BindError::mismatch("", kind.as_str(), value.type_name()))
}

/// Decodes text into a scalar of the given kind.
pub fn decode(text: &str, kind: ScalarKind) -> Result<Scalar> {
    StandardConverter(kind)
        .decode(text)
        .map_err(|source| conversion_error(kind, text, source))
}

fn conversion_error(kind: ScalarKind, text: &str, source: CodecError) -> BindError {
    BindError::Conversion {
        kind,
        raw_text: text.to_string(),
        property: None,
        source,
    }
}

/// Per-kind converter overrides, falling back to [`StandardConverter`].
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    overrides: HashMap<ScalarKind, Arc<dyn ValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the converter used for `kind`.
    pub fn register(&mut self, kind: ScalarKind, converter: Arc<dyn ValueConverter>) {
        self.overrides.insert(kind, converter);
    }

    pub fn is_overridden(&self, kind: ScalarKind) -> bool {
        self.overrides.contains_key(&kind)
    }

    pub fn encode(&self, value: &Scalar, kind: ScalarKind) -> Result<String> {
        match self.overrides.get(&kind) {
            Some(converter) => converter
                .encode(value)
                .ok_or_else(|| BindError::mismatch("", kind.as_str(), value.type_name())),
            None => encode(value, kind),
        }
    }

    pub fn decode(&self, text: &str, kind: ScalarKind) -> Result<Scalar> {
        match self.overrides.get(&kind) {
            Some(converter) => converter
                .decode(text)
                .map_err(|source| conversion_error(kind, text, source)),
            None => decode(text, kind),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.overrides.keys().map(ScalarKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("overrides", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_binary_is_base64() {
        let text = encode(&Scalar::Bytes(b"Hello".to_vec()), ScalarKind::Binary).unwrap();
        assert_eq!(text, "SGVsbG8=");
        assert_eq!(
            decode("SGVsbG8=", ScalarKind::Binary).unwrap(),
            Scalar::Bytes(b"Hello".to_vec())
        );
    }

    #[test]
    fn test_empty_binary() {
        let text = encode(&Scalar::Bytes(vec![]), ScalarKind::Binary).unwrap();
        assert_eq!(text, "");
        assert_eq!(decode("", ScalarKind::Binary).unwrap(), Scalar::Bytes(vec![]));
    }

    #[test]
    fn test_hex_binary() {
        let text = encode(&Scalar::Bytes(vec![0xca, 0xfe]), ScalarKind::HexBinary).unwrap();
        assert_eq!(text, "CAFE");
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let text = encode(&Scalar::Decimal(dec!(10.50)), ScalarKind::Decimal).unwrap();
        assert_eq!(text, "10.50");
    }

    #[test]
    fn test_kind_mismatch_on_encode() {
        let err = encode(&Scalar::String("x".into()), ScalarKind::Integer).unwrap_err();
        assert!(matches!(
            err,
            BindError::SchemaMismatch { expected: "integer", found: "string", .. }
        ));
    }

    #[test]
    fn test_conversion_error_carries_raw_text() {
        let err = decode("twelve", ScalarKind::Integer).unwrap_err();
        match err {
            BindError::Conversion { kind, raw_text, .. } => {
                assert_eq!(kind, ScalarKind::Integer);
                assert_eq!(raw_text, "twelve");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_registry_override() {
        let mut registry = ConverterRegistry::new();
        registry.register(ScalarKind::Binary, Arc::new(Base64UrlConverter));
        let bytes = Scalar::Bytes(vec![0xfb, 0xff]);
        assert_eq!(registry.encode(&bytes, ScalarKind::Binary).unwrap(), "-_8=");
        assert_eq!(registry.decode("-_8=", ScalarKind::Binary).unwrap(), bytes);
        // Other kinds keep the standard converter.
        assert_eq!(
            registry.encode(&Scalar::Integer(7), ScalarKind::Integer).unwrap(),
            "7"
        );
        assert_eq!(format!("{registry:?}"), "ConverterRegistry { overrides: [\"binary\"] }");
    }

    #[test]
    fn test_scalar_kind_serde_names() {
        assert_eq!(serde_json::to_string(&ScalarKind::HexBinary).unwrap(), "\"hex_binary\"");
        assert_eq!(serde_json::to_string(&ScalarKind::QName).unwrap(), "\"qname\"");
        assert_eq!(
            serde_json::from_str::<ScalarKind>("\"date_time\"").unwrap(),
            ScalarKind::DateTime
        );
    }

    proptest! {
        #[test]
        fn binary_fidelity(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let text = encode(&Scalar::Bytes(bytes.clone()), ScalarKind::Binary).unwrap();
            prop_assert_eq!(decode(&text, ScalarKind::Binary).unwrap(), Scalar::Bytes(bytes));
        }

        #[test]
        fn integer_round_trips(v in any::<i64>()) {
            let text = encode(&Scalar::Integer(v), ScalarKind::Integer).unwrap();
            prop_assert_eq!(decode(&text, ScalarKind::Integer).unwrap(), Scalar::Integer(v));
        }
    }
}
