//! Booleans and numbers in their XML Schema lexical forms.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{CodecError, Result};

/// Converts a boolean to its canonical lexical form.
pub fn encode_bool(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

/// Parses `true`, `false`, `1` or `0`.
pub fn decode_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CodecError::Boolean),
    }
}

pub fn encode_integer(v: i64) -> String {
    v.to_string()
}

pub fn decode_integer(text: &str) -> Result<i64> {
    text.trim().parse::<i64>().map_err(|e| CodecError::Number {
        message: e.to_string(),
    })
}

/// Formats a float using the shortest text that parses back to the same value.
///
/// Non-finite values use the XML Schema spellings `INF`, `-INF` and `NaN`.
pub fn encode_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let text = if v > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else {
        v.to_string()
    }
}

pub fn decode_float(text: &str) -> Result<f64> {
    match text.trim() {
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        other => other.parse::<f64>().map_err(|e| CodecError::Number {
            message: e.to_string(),
        }),
    }
}

/// Formats a decimal, preserving its scale (`1.50` stays `1.50`).
pub fn encode_decimal(v: &Decimal) -> String {
    v.to_string()
}

pub fn decode_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| CodecError::Number {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_to_string() {
        assert_eq!(encode_bool(true), "true");
        assert_eq!(encode_bool(false), "false");
    }

    #[test]
    fn test_decode_bool_accepts_numeric_forms() {
        assert!(decode_bool("1").unwrap());
        assert!(!decode_bool("0").unwrap());
        assert!(decode_bool(" true ").unwrap());
        assert_eq!(decode_bool("yes"), Err(CodecError::Boolean));
    }

    #[test]
    fn test_integers() {
        assert_eq!(encode_integer(-42), "-42");
        assert_eq!(decode_integer("17").unwrap(), 17);
        assert!(decode_integer("1.5").is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(encode_float(1.0), "1");
        assert_eq!(encode_float(0.25), "0.25");
        assert_eq!(encode_float(f64::INFINITY), "INF");
        assert_eq!(encode_float(f64::NEG_INFINITY), "-INF");
        assert_eq!(encode_float(f64::NAN), "NaN");
        assert_eq!(decode_float("-INF").unwrap(), f64::NEG_INFINITY);
        assert!(decode_float("NaN").unwrap().is_nan());
        assert_eq!(decode_float("2.5e3").unwrap(), 2500.0);
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let d = decode_decimal("1.50").unwrap();
        assert_eq!(encode_decimal(&d), "1.50");
        assert!(decode_decimal("abc").is_err());
    }

    #[test]
    fn test_decimal_scientific() {
        let d = decode_decimal("1.5e2").unwrap();
        assert_eq!(d, Decimal::from(150));
    }
}
