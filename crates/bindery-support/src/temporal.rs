//! Date and time codecs built on `chrono`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};

use crate::error::Result;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Formats a timestamp as RFC 3339; a zero offset is written as `Z`.
pub fn encode_datetime(v: &DateTime<FixedOffset>) -> String {
    v.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn decode_datetime(text: &str) -> Result<DateTime<FixedOffset>> {
    Ok(DateTime::parse_from_rfc3339(text.trim())?)
}

pub fn encode_date(v: &NaiveDate) -> String {
    v.format(DATE_FORMAT).to_string()
}

pub fn decode_date(text: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)?)
}

/// Formats a time of day; fractional seconds appear only when non-zero.
pub fn encode_time(v: &NaiveTime) -> String {
    v.format(TIME_FORMAT).to_string()
}

pub fn decode_time(text: &str) -> Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(text.trim(), TIME_FORMAT)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_round_trip() {
        let dt = decode_datetime("2024-03-01T10:15:00+02:00").unwrap();
        assert_eq!(encode_datetime(&dt), "2024-03-01T10:15:00+02:00");
        assert_eq!(decode_datetime(&encode_datetime(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_datetime_utc_uses_z() {
        let dt = decode_datetime("2024-03-01T10:15:00+00:00").unwrap();
        assert_eq!(encode_datetime(&dt), "2024-03-01T10:15:00Z");
    }

    #[test]
    fn test_date() {
        let d = decode_date("1974-12-25").unwrap();
        assert_eq!(encode_date(&d), "1974-12-25");
        assert!(decode_date("1974-13-25").is_err());
    }

    #[test]
    fn test_time() {
        let t = decode_time("08:30:00").unwrap();
        assert_eq!(encode_time(&t), "08:30:00");
        let t = decode_time("08:30:00.250").unwrap();
        assert_eq!(encode_time(&t), "08:30:00.250");
    }
}
