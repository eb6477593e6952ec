use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a stored timestamp into an instant.
///
/// Accepts RFC 3339 (`2026-10-19T08:30:00Z`, `+02:00` offsets), naive
/// date-times without an offset (read as UTC, with or without fractional
/// seconds) and plain dates (midnight UTC). Anything else yields `None`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // Postgres timestamptz text form: "2026-10-19 08:30:00.123+00"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a stored timestamp down to its calendar day (UTC).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_instant(raw).map(|dt| dt.date_naive())
}

/// Parse an optional stored timestamp.
pub fn parse_opt(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_instant)
}

/// Canonical text form used when this crate writes a timestamp.
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_instant("2026-10-19T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_instant("2026-10-19T08:30:00.250").unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert_eq!(
            parse_instant("2026-10-19").unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_postgres_text_form() {
        let parsed = parse_instant("2026-10-19 08:30:00.123+00").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[test]
    fn test_parse_day_from_timestamp() {
        assert_eq!(
            parse_day("2026-10-19T23:59:59Z"),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
    }

    #[test]
    fn test_parse_day_ignores_surrounding_whitespace() {
        assert_eq!(parse_day("  2026-10-19 \n"), NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(
            parse_day("\t2026-10-19T08:30:00+02:00 "),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
        assert!(parse_day("   ").is_none());
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("next tuesday").is_none());
        assert!(parse_day("19/10/2026").is_none());
        assert!(parse_opt(None).is_none());
    }

    #[test]
    fn test_format_instant_round_trips() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(format_instant(at), "2026-10-19T08:30:00.000Z");
        assert_eq!(parse_instant(&format_instant(at)), Some(at));
    }
}
