//! Release-date normalization.
//!
//! Historical records stored release dates either as real dates or as
//! `M/D/YYYY` strings. Comparing the strings directly misorders one- and
//! two-digit months and days (`"10/1/2020" < "9/1/2020"`), so every date that
//! enters the system (stored values, create input, query bounds) goes through
//! [`parse_release_date`] and is compared as a [`ReleaseDate`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::ReleaseDate;

/// Accepted naive date-time layouts (no offset).
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse any supported release-date representation into a calendar date.
///
/// Supported forms:
///
/// - `YYYY-MM-DD`
/// - RFC 3339 date-times; the UTC calendar date is used
/// - naive ISO date-times (`YYYY-MM-DDTHH:MM:SS[.fff]`)
/// - legacy `M/D/YYYY` with one- or two-digit month and day
///
/// Returns `None` for empty or unrecognised input.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cinedash_core::release_date::parse_release_date;
///
/// let expected = NaiveDate::from_ymd_opt(2009, 12, 18);
/// assert_eq!(parse_release_date("2009-12-18"), expected);
/// assert_eq!(parse_release_date("12/18/2009"), expected);
/// assert_eq!(parse_release_date("2009-12-18T00:00:00.000Z"), expected);
/// assert_eq!(parse_release_date(""), None);
/// ```
pub fn parse_release_date(raw: &str) -> Option<ReleaseDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc().date());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    parse_slash_date(raw)
}

/// Parse the legacy `M/D/YYYY` layout.
///
/// Split by hand rather than through a format string so that single-digit
/// components are accepted regardless of padding.
fn parse_slash_date(raw: &str) -> Option<ReleaseDate> {
    let mut parts = raw.split('/');
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let year_part = parts.next()?.trim();
    if parts.next().is_some() || year_part.len() != 4 {
        return None;
    }
    let year = year_part.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> ReleaseDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_release_date("2020-03-07"), Some(ymd(2020, 3, 7)));
    }

    #[test]
    fn parses_rfc3339_as_utc_date() {
        assert_eq!(
            parse_release_date("2020-01-01T05:00:00.000Z"),
            Some(ymd(2020, 1, 1))
        );
        // 23:30 at -05:00 is already the next day in UTC.
        assert_eq!(
            parse_release_date("2020-01-01T23:30:00-05:00"),
            Some(ymd(2020, 1, 2))
        );
    }

    #[test]
    fn parses_naive_datetime() {
        assert_eq!(
            parse_release_date("2019-07-04T12:00:00"),
            Some(ymd(2019, 7, 4))
        );
        assert_eq!(
            parse_release_date("2019-07-04 12:00:00.250"),
            Some(ymd(2019, 7, 4))
        );
    }

    #[test]
    fn parses_legacy_single_and_double_digit_components() {
        assert_eq!(parse_release_date("9/1/2020"), Some(ymd(2020, 9, 1)));
        assert_eq!(parse_release_date("10/1/2020"), Some(ymd(2020, 10, 1)));
        assert_eq!(parse_release_date("09/01/2020"), Some(ymd(2020, 9, 1)));
        assert_eq!(parse_release_date(" 12/18/2009 "), Some(ymd(2009, 12, 18)));
    }

    #[test]
    fn legacy_dates_order_as_dates_not_strings() {
        let sep = parse_release_date("9/1/2020").unwrap();
        let oct = parse_release_date("10/1/2020").unwrap();
        assert!("10/1/2020" < "9/1/2020");
        assert!(oct > sep);
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_release_date(""), None);
        assert_eq!(parse_release_date("   "), None);
        assert_eq!(parse_release_date("Unknown"), None);
        assert_eq!(parse_release_date("13/1/2020"), None);
        assert_eq!(parse_release_date("2/30/2020"), None);
        assert_eq!(parse_release_date("1/1/20"), None);
        assert_eq!(parse_release_date("1/1/2020/5"), None);
    }
}
