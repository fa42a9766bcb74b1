//! Time related utils.

use crate::Error;
use chrono::NaiveDateTime;
use chrono::Utc;

/// The date and time type used across the signing code.
pub type DateTime = chrono::DateTime<Utc>;

/// Current UTC instant.
///
/// Signing captures this exactly once per call so that the date stamp and
/// the full timestamp can never disagree.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into the date stamp: `20240101`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime into the compact ISO 8601 timestamp: `20240101T000000Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse a compact ISO 8601 timestamp like `20240101T000000Z`.
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")
        .map_err(|e| Error::unexpected(format!("invalid timestamp {s}")).with_source(e))?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let t = parse_iso8601("20220313T072004Z").expect("must parse");
        assert_eq!(format_date(t), "20220313");
        assert_eq!(format_iso8601(t), "20220313T072004Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_iso8601("2022-03-13T07:20:04Z").is_err());
        assert!(parse_iso8601("not a time").is_err());
    }
}
