//! Parsers for locale-formatted usage strings
//!
//! The carrier reports quantities as display strings: data volumes like
//! `"1.208,52 MB"` (Dutch locale, `.` thousands separator and `,` decimal
//! separator) and call durations like `"39:36"` (`MM:SS`). These parsers
//! normalize both into numbers.
//!
//! Both functions degrade to `0` on malformed input and never return an
//! error; one garbled record must not abort aggregation of the rest of the
//! dataset.

use once_cell::sync::Lazy;
use regex::Regex;

/// Unit-anchored volume patterns, checked in order GB, MB, KB.
///
/// The unit must terminate on a word boundary so that matching anchors on
/// the unit word itself ("1 GBP" is not one gigabyte). Order matters: a GB
/// match must win before the MB pattern gets a chance to look at the same
/// text.
static VOLUME_PATTERNS: Lazy<[(Regex, f64); 3]> = Lazy::new(|| {
    [
        (Regex::new(r"(?i)(\d[\d.,]*)\s*GB\b").unwrap(), 1000.0),
        (Regex::new(r"(?i)(\d[\d.,]*)\s*MB\b").unwrap(), 1.0),
        (Regex::new(r"(?i)(\d[\d.,]*)\s*KB\b").unwrap(), 0.001),
    ]
});

/// Fallback: first bare numeric token, comma-as-decimal.
static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*").unwrap());

/// Parse a locale-formatted data volume into megabytes.
///
/// Searches for the first numeric token immediately preceding a unit suffix
/// (GB, MB, KB, case-insensitive). When no unit-qualified token is found,
/// the first bare numeric token is taken and treated as MB. No numeric token
/// at all yields `0.0`.
///
/// # Examples
/// ```
/// use cdrstat_core::parse::parse_data_volume;
///
/// assert_eq!(parse_data_volume("1.208,52 MB"), 1208.52);
/// assert_eq!(parse_data_volume("1,5 GB"), 1500.0);
/// assert_eq!(parse_data_volume("garbage"), 0.0);
/// ```
pub fn parse_data_volume(text: &str) -> f64 {
    for (pattern, factor) in VOLUME_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text)
            && let Some(value) = parse_locale_number(&captures[1])
        {
            return value * factor;
        }
    }

    // No unit-qualified match; take the first bare number as MB.
    if let Some(token) = BARE_NUMBER.find(text)
        && let Ok(value) = token.as_str().replace(',', ".").parse::<f64>()
    {
        return value;
    }

    0.0
}

/// Normalize a `.`-thousands / `,`-decimal token and parse it.
fn parse_locale_number(token: &str) -> Option<f64> {
    token.replace('.', "").replace(',', ".").parse().ok()
}

/// Parse a `MM:SS` call duration into whole minutes.
///
/// Any nonzero seconds round up one minute, so `"39:36"` is 40 minutes and
/// `"39:00"` is 39. Anything that is not exactly two colon-delimited integer
/// fields yields `0`.
///
/// # Examples
/// ```
/// use cdrstat_core::parse::parse_call_duration;
///
/// assert_eq!(parse_call_duration("39:36"), 40);
/// assert_eq!(parse_call_duration("39:00"), 39);
/// assert_eq!(parse_call_duration("bad"), 0);
/// ```
pub fn parse_call_duration(text: &str) -> u64 {
    let mut fields = text.split(':');
    let (Some(minutes), Some(seconds), None) = (fields.next(), fields.next(), fields.next())
    else {
        return 0;
    };
    let (Ok(minutes), Ok(seconds)) = (minutes.parse::<u64>(), seconds.parse::<u64>()) else {
        return 0;
    };

    minutes + u64::from(seconds > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_volume_locale_thousands() {
        assert_eq!(parse_data_volume("1.208,52 MB"), 1208.52);
        assert_eq!(parse_data_volume("2.000 MB"), 2000.0);
    }

    #[test]
    fn test_parse_data_volume_units() {
        assert_eq!(parse_data_volume("1,5 GB"), 1500.0);
        assert_eq!(parse_data_volume("500,25 MB"), 500.25);
        assert_eq!(parse_data_volume("250 KB"), 0.25);
        assert_eq!(parse_data_volume("2 gb"), 2000.0);
    }

    #[test]
    fn test_parse_data_volume_unit_order() {
        // GB wins over MB even when the MB token appears first in the text.
        assert_eq!(parse_data_volume("100 MB of 1 GB"), 1000.0);
    }

    #[test]
    fn test_parse_data_volume_anchors_on_unit_word() {
        // "GBP" is not a gigabyte; the bare-number fallback applies instead.
        assert_eq!(parse_data_volume("5 GBP"), 5.0);
    }

    #[test]
    fn test_parse_data_volume_no_space_before_unit() {
        assert_eq!(parse_data_volume("150,00MB"), 150.0);
    }

    #[test]
    fn test_parse_data_volume_bare_number_fallback() {
        assert_eq!(parse_data_volume("123,4"), 123.4);
        assert_eq!(parse_data_volume("used 75 units"), 75.0);
    }

    #[test]
    fn test_parse_data_volume_degrades_to_zero() {
        assert_eq!(parse_data_volume(""), 0.0);
        assert_eq!(parse_data_volume("garbage"), 0.0);
        assert_eq!(parse_data_volume("MB"), 0.0);
    }

    #[test]
    fn test_parse_data_volume_unparseable_token_falls_through() {
        // ",," is not a number; the fallback then finds no clean token either.
        assert_eq!(parse_data_volume("1,2,3 MB"), 0.0);
    }

    #[test]
    fn test_parse_call_duration_rounds_up() {
        assert_eq!(parse_call_duration("39:36"), 40);
        assert_eq!(parse_call_duration("0:01"), 1);
        assert_eq!(parse_call_duration("12:59"), 13);
    }

    #[test]
    fn test_parse_call_duration_whole_minutes() {
        assert_eq!(parse_call_duration("39:00"), 39);
        assert_eq!(parse_call_duration("0:00"), 0);
    }

    #[test]
    fn test_parse_call_duration_malformed() {
        assert_eq!(parse_call_duration("bad"), 0);
        assert_eq!(parse_call_duration(""), 0);
        assert_eq!(parse_call_duration("1:2:3"), 0);
        assert_eq!(parse_call_duration("12:xx"), 0);
        assert_eq!(parse_call_duration("-1:30"), 0);
        assert_eq!(parse_call_duration(" 39:36"), 0);
    }
}
