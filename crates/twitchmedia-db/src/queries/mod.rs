//! Database query modules.
//!
//! - files: Online media file index (candidate selection, lookup, creation)
//! - metadata: Per-file metadata reads and partial updates
//! - processed_files: Derived file records and their invalidation

pub mod files;
pub mod metadata;
pub mod processed_files;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored timestamp.
///
/// Rows written by this crate use RFC 3339; rows defaulted by SQLite use
/// `YYYY-MM-DD HH:MM:SS` in UTC. Unparseable values fall back to now.
pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00+00:00"), expected);
        assert_eq!(parse_timestamp("2024-03-01 12:30:00"), expected);
    }
}
