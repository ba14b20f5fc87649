//! Time value parsing.
//!
//! Converts cluster time values (`"30d"`, `"18.67d"`, `"12h"`, `"0ms"`) to
//! fractional days.

use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for time values: a non-negative number followed by a unit.
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(d|h|m|s|ms|micros|nanos)$").expect("duration regex is valid")
});

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Parse a time value to days.
///
/// An empty value means "no minimum age" and parses as 0. A bare `0` is
/// accepted as well; any other value needs a unit.
///
/// # Examples
/// - "30d" -> 30.0
/// - "12h" -> 0.5
/// - "0ms" -> 0.0
pub fn parse_duration_days(value: &str, field: &str) -> Result<f64, ParseError> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() || trimmed == "0" {
        return Ok(0.0);
    }

    let caps = DURATION_REGEX
        .captures(&trimmed)
        .ok_or_else(|| ParseError::bad_duration(field, value))?;

    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| ParseError::bad_duration(field, value))?;

    let seconds = match &caps[2] {
        "d" => return Ok(amount),
        "h" => amount * 3600.0,
        "m" => amount * 60.0,
        "s" => amount,
        "ms" => amount / 1_000.0,
        "micros" => amount / 1_000_000.0,
        "nanos" => amount / 1_000_000_000.0,
        _ => return Err(ParseError::bad_duration(field, value)),
    };

    Ok(seconds / SECONDS_PER_DAY)
}
