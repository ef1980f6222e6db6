//! Duration parsing for configuration values.
//!
//! Supports human-readable duration formats like "500ms", "30s", "5m", "24h".

use crate::error::Error;
use std::time::Duration;

/// Parses a human-readable duration string into a `Duration`.
///
/// Supported formats:
/// - Milliseconds: "100ms", "500ms"
/// - Seconds: "1s", "30s"
/// - Minutes: "1m", "30m"
/// - Hours: "1h", "24h"
/// - Plain number (treated as seconds): "3600"
///
/// # Errors
///
/// Returns a `Config` error if the format is invalid or the value is out of range.
///
/// # Examples
///
/// ```
/// use scalr_cli::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
/// assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
/// assert_eq!(parse_duration("60").unwrap(), Duration::from_secs(60));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, Error> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::config("Duration cannot be empty"));
    }

    let parse = |number: &str, unit: &str| {
        number
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::config(format!("Invalid {unit} value: {number}")))
    };
    let scaled = |value: u64, factor: u64| {
        value
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| Error::config(format!("Duration out of range: {s}")))
    };

    if let Some(ms_str) = s.strip_suffix("ms") {
        return parse(ms_str, "milliseconds").map(Duration::from_millis);
    }

    if let Some(h_str) = s.strip_suffix('h') {
        return scaled(parse(h_str, "hours")?, 3600);
    }

    if let Some(m_str) = s.strip_suffix('m') {
        return scaled(parse(m_str, "minutes")?, 60);
    }

    if let Some(s_str) = s.strip_suffix('s') {
        return parse(s_str, "seconds").map(Duration::from_secs);
    }

    s.parse::<u64>().map(Duration::from_secs).map_err(|_| {
        Error::config(format!(
            "Invalid duration format: {s}. Use format like '500ms', '30s', '5m', or '24h'"
        ))
    })
}
