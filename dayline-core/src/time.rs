//! Time utilities: wall-clock "HH:MM" strings <-> minute offsets from midnight.

use thiserror::Error;
use tracing::warn;

/// Minutes since local midnight.
///
/// Valid wall-clock values are 0..=1439, but raw interval ends (start + duration)
/// can run past midnight before clamping, so this stays a plain signed integer.
pub type Minute = i32;

pub const MINUTES_PER_DAY: Minute = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("malformed time string '{0}' (expected HH:MM)")]
    Malformed(String),
}

/// Parse "HH:MM" (or "HH:MM:SS", seconds ignored) into minutes since midnight.
///
/// Range is not checked: "25:00" yields 1500. Range belongs to the data source.
pub fn parse_hhmm_strict(s: &str) -> Result<Minute, TimeParseError> {
    let malformed = || TimeParseError::Malformed(s.to_string());
    let mut parts = s.trim().split(':');

    let hour = parts.next().and_then(parse_digits).ok_or_else(malformed)?;
    let minute = parts.next().and_then(parse_digits).ok_or_else(malformed)?;
    if let Some(sec) = parts.next() {
        parse_digits(sec).ok_or_else(malformed)?;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }

    Ok(hour * 60 + minute)
}

/// Parse "HH:MM" the forgiving way: a missing or unreadable component counts as 0.
///
/// "9" is 09:00, "09:" is 09:00, "xx:30" is 00:30. A warning is logged whenever
/// a default had to be substituted.
pub fn parse_hhmm_lenient(s: &str) -> Minute {
    if let Ok(m) = parse_hhmm_strict(s) {
        return m;
    }

    let (h, m) = match s.trim().split_once(':') {
        Some((h, rest)) => (h, rest.split(':').next()),
        None => (s.trim(), None),
    };
    let hour = parse_digits(h).unwrap_or(0);
    let minute = m.and_then(parse_digits).unwrap_or(0);

    warn!(input = s, hour, minute, "time_string_defaulted");
    hour * 60 + minute
}

/// Format minutes since midnight as zero-padded "HH:MM".
///
/// 1440 (end of day) renders as "24:00".
pub fn format_hhmm(minute: Minute) -> String {
    let m = minute.max(0);
    format!("{:02}:{:02}", m / 60, m % 60)
}

fn parse_digits(s: &str) -> Option<Minute> {
    let s = s.trim();
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
