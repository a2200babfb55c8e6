//! Datetime detection, including the epoch heuristic.

use crate::inference::parse::{digit_count, from_epoch_millis, from_epoch_seconds, parse_calendar, parse_number};
use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

const EPOCH_SECONDS_DIGITS: u32 = 10;
const EPOCH_MILLIS_DIGITS: u32 = 13;

/// Matches timestamps.
///
/// If every value is a non-negative whole number, the column is only accepted as an epoch:
/// all 13-digit values are milliseconds, all 10-digit values are seconds, and any other digit
/// layout is rejected without trying calendar parsing. Otherwise each value is parsed as a
/// calendar date/time (see [`parse_calendar`]); values that fail become missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatetimeDetector;

impl Detector for DatetimeDetector {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        if values.is_empty() {
            return Detection::NoMatch;
        }
        if let Some(whole) = whole_non_negative(values) {
            return detect_epoch(&whole);
        }

        let out = values
            .iter()
            .map(|value| match value {
                Value::DateTime(dt) => Value::DateTime(*dt),
                other => other
                    .as_text()
                    .and_then(parse_calendar)
                    .map(Value::DateTime)
                    .unwrap_or(Value::Null),
            })
            .collect();
        Detection::unless_all_missing(TypeTag::Datetime, out)
    }
}

/// Every value as a non-negative integer, or `None` if any value is not one.
fn whole_non_negative(values: &[Value]) -> Option<Vec<u128>> {
    values
        .iter()
        .map(|v| {
            let whole = parse_number(v)?.as_whole()?;
            u128::try_from(whole).ok()
        })
        .collect()
}

fn detect_epoch(whole: &[u128]) -> Detection {
    let digits = |n: &u128| digit_count(*n);
    let convert: fn(i64) -> Option<chrono::NaiveDateTime> =
        if whole.iter().all(|n| digits(n) == EPOCH_MILLIS_DIGITS) {
            from_epoch_millis
        } else if whole.iter().all(|n| digits(n) == EPOCH_SECONDS_DIGITS) {
            from_epoch_seconds
        } else {
            return Detection::NoMatch;
        };

    let out = whole
        .iter()
        .map(|n| {
            i64::try_from(*n)
                .ok()
                .and_then(convert)
                .map(Value::DateTime)
                .unwrap_or(Value::Null)
        })
        .collect();
    Detection::unless_all_missing(TypeTag::Datetime, out)
}
