//! Value parsers and fixed lookup tables shared by the detectors and the hint resolver.
//!
//! Every parser here is total: malformed input yields `None`, never a panic or an error.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::types::{Complex, Value};

/// Strings (lower-cased) that mean `true`.
pub static TRUE_ALIASES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["yes", "t", "enabled", "on", "true"].into_iter().collect());

/// Strings (lower-cased) that mean `false`.
pub static FALSE_ALIASES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["no", "f", "disabled", "off", "false"].into_iter().collect());

/// Duration unit words and their length in seconds.
///
/// Months are 30 days and years are 365 days.
pub static DURATION_UNITS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        ("second", 1.0),
        ("seconds", 1.0),
        ("minute", 60.0),
        ("minutes", 60.0),
        ("hour", 3_600.0),
        ("hours", 3_600.0),
        ("day", 86_400.0),
        ("days", 86_400.0),
        ("week", 604_800.0),
        ("weeks", 604_800.0),
        ("month", 2_592_000.0),
        ("months", 2_592_000.0),
        ("year", 31_536_000.0),
        ("years", 31_536_000.0),
    ]
    .into_iter()
    .collect()
});

/// Short unit spellings accepted by [`parse_timedelta`] in addition to [`DURATION_UNITS`].
static UNIT_ABBREVIATIONS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    [
        ("ns", 1e-9),
        ("us", 1e-6),
        ("ms", 1e-3),
        ("s", 1.0),
        ("sec", 1.0),
        ("secs", 1.0),
        ("m", 60.0),
        ("min", 60.0),
        ("mins", 60.0),
        ("h", 3_600.0),
        ("hr", 3_600.0),
        ("hrs", 3_600.0),
        ("d", 86_400.0),
        ("w", 604_800.0),
    ]
    .into_iter()
    .collect()
});

// `%Y` accepts as few as one digit, so layouts that start with a day or month come before
// year-first ones, and two-digit-year layouts come before their four-digit siblings (`%y`
// rejects the trailing input of "2024"). Parsed years outside 1000..=9999 are discarded.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%a, %d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// 2^127; floats in `[-2^127, 2^127)` convert to `i128` exactly.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// A parsed numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// True if the value has no fractional part, whatever its magnitude.
    pub fn is_integral(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(v) => v.is_finite() && v.fract() == 0.0,
        }
    }

    /// The value as an `i128`, if it is integral and in range.
    pub fn as_whole(self) -> Option<i128> {
        match self {
            Number::Int(v) => Some(v),
            Number::Float(v) if self.is_integral() && (-I128_BOUND..I128_BOUND).contains(&v) => Some(v as i128),
            Number::Float(_) => None,
        }
    }
}

/// Numeric reading of a cell. NaN and non-numeric values yield `None`.
pub fn parse_number(value: &Value) -> Option<Number> {
    match value {
        Value::Utf8(_) | Value::Category(_) => parse_number_str(value.as_text()?),
        Value::Bool(b) => Some(Number::Int(i128::from(*b))),
        Value::Int8(v) => Some(Number::Int(i128::from(*v))),
        Value::Int16(v) => Some(Number::Int(i128::from(*v))),
        Value::Int32(v) => Some(Number::Int(i128::from(*v))),
        Value::Int64(v) => Some(Number::Int(i128::from(*v))),
        Value::Float32(v) if !v.is_nan() => Some(Number::Float(f64::from(*v))),
        Value::Float64(v) if !v.is_nan() => Some(Number::Float(*v)),
        _ => None,
    }
}

fn parse_number_str(raw: &str) -> Option<Number> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i128>() {
        return Some(Number::Int(v));
    }
    match s.parse::<f64>() {
        Ok(v) if !v.is_nan() => Some(Number::Float(v)),
        _ => None,
    }
}

/// Look a string up in the boolean alias tables (case-insensitive).
pub fn lookup_bool_alias(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_lowercase();
    if TRUE_ALIASES.contains(lowered.as_str()) {
        Some(true)
    } else if FALSE_ALIASES.contains(lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parse exactly `<number><optional whitespace><unit word>`, e.g. `"2 hours"` or `"1.5day"`.
pub fn parse_duration_literal(raw: &str) -> Option<TimeDelta> {
    let s = raw.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let amount = parse_plain_number(number)?;
    let unit = unit.trim_start().to_ascii_lowercase();
    let seconds = DURATION_UNITS.get(unit.as_str())?;
    seconds_to_timedelta(amount * seconds)
}

/// Lenient time-delta parsing for explicit `duration` hints.
///
/// Accepts one or more `<number><unit>` components (full unit words or abbreviations such as
/// `h`, `min`, `ms`), clock components (`HH:MM[:SS[.fff]]`), an optional leading `-`, and bare
/// numbers, which are read as seconds. Example: `"1 days 02:30:00"`.
pub fn parse_timedelta(raw: &str) -> Option<TimeDelta> {
    let s = raw.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }
    if let Ok(seconds) = s.parse::<f64>() {
        return seconds_to_timedelta(seconds);
    }

    let (negative, mut rest) = match s.strip_prefix('-') {
        Some(tail) => (true, tail),
        None => (false, s.as_str()),
    };

    let mut total = 0.0_f64;
    let mut components = 0usize;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ':'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(number_len);
        if number.contains(':') {
            total += parse_clock(number)?;
            rest = tail;
        } else {
            let amount = parse_plain_number(number)?;
            let tail = tail.trim_start();
            let unit_len = tail
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(tail.len());
            let (unit, after) = tail.split_at(unit_len);
            total += amount * unit_seconds(unit)?;
            rest = after;
        }
        components += 1;
    }

    if components == 0 {
        return None;
    }
    seconds_to_timedelta(if negative { -total } else { total })
}

fn unit_seconds(unit: &str) -> Option<f64> {
    DURATION_UNITS
        .get(unit)
        .or_else(|| UNIT_ABBREVIATIONS.get(unit))
        .copied()
}

fn parse_clock(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, sec] => (*h, *m, *sec),
        _ => return None,
    };
    let hours = parse_plain_number(hours)?;
    let minutes = parse_plain_number(minutes)?;
    let seconds = parse_plain_number(seconds)?;
    Some(hours * 3_600.0 + minutes * 60.0 + seconds)
}

/// Unsigned decimal made of digits and at most one `.`.
fn parse_plain_number(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) || s.bytes().filter(|b| *b == b'.').count() > 1 {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Convert (possibly fractional) seconds into a [`TimeDelta`] with nanosecond precision.
pub fn seconds_to_timedelta(seconds: f64) -> Option<TimeDelta> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole.abs() >= i64::MAX as f64 / 1_000.0 {
        return None;
    }
    let mut secs = whole as i64;
    let mut nanos = ((seconds - whole) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    TimeDelta::new(secs, nanos)
}

/// Generic calendar parsing: RFC 3339 / RFC 2822, common date-time layouts, then date-only
/// layouts (at midnight). Offsets are normalized to UTC.
pub fn parse_calendar(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .find(|dt| plausible_year(dt.year()))
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| plausible_year(d.year()))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn plausible_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

pub fn from_epoch_seconds(secs: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Number of decimal digits in `n`.
pub fn digit_count(n: u128) -> u32 {
    n.checked_ilog10().map(|log| log + 1).unwrap_or(1)
}

/// Parse a complex literal such as `1+2j`, `(3-4.5J)`, `-2j` or `7`. Whitespace anywhere in the
/// input is ignored.
pub fn parse_complex(raw: &str) -> Option<Complex> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(&compact);
    if body.is_empty() {
        return None;
    }

    let Some(imaginary) = body.strip_suffix(|c: char| c == 'j' || c == 'J') else {
        return parse_real(body).map(|re| Complex::new(re, 0.0));
    };

    // The real/imaginary boundary is the last sign that is neither leading nor an exponent sign.
    let bytes = imaginary.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    match split {
        Some(i) => {
            let re = parse_real(&imaginary[..i])?;
            let im = parse_real(&imaginary[i..])?;
            Some(Complex::new(re, im))
        }
        None => parse_real(imaginary).map(|im| Complex::new(0.0, im)),
    }
}

fn parse_real(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}
