//! Direct coercion of hinted columns.
//!
//! A hinted column skips the detector chain. Values that cannot be represented in the requested
//! type become [`Value::Null`]; coercion never fails as a whole.

use std::str::FromStr;

use crate::inference::detectors::dictionary_encode;
use crate::inference::detectors::numeric::cast_number;
use crate::inference::parse::{
    digit_count, from_epoch_millis, from_epoch_seconds, lookup_bool_alias, parse_calendar, parse_complex,
    parse_number, parse_timedelta, seconds_to_timedelta,
};
use crate::types::{Complex, TypeTag, Value};

/// Result of applying a raw hint tag to a column.
#[derive(Debug, Clone, PartialEq)]
pub enum HintOutcome {
    /// The tag was recognized and the values were coerced.
    Applied { tag: TypeTag, values: Vec<Value> },
    /// The tag is not in the vocabulary; the values are returned unchanged.
    UnknownTag { values: Vec<Value> },
}

/// Parse `raw_tag` and coerce `values` to it.
pub fn resolve_hint(values: Vec<Value>, raw_tag: &str) -> HintOutcome {
    match TypeTag::from_str(raw_tag) {
        Ok(tag) => HintOutcome::Applied {
            tag,
            values: coerce_to_tag(values, tag),
        },
        Err(_) => HintOutcome::UnknownTag { values },
    }
}

/// Coerce every value of a column to `tag`.
///
/// | tag | behavior |
/// |---|---|
/// | `object` | unchanged |
/// | `int*`, `float*` | numeric cast; non-numeric, fractional (for ints) or out-of-range values are missing |
/// | `bool` | booleans as-is; alias strings; numbers and numeric strings are `true` when non-zero |
/// | `datetime` | calendar parsing; whole numbers are epoch milliseconds at 13 digits, epoch seconds otherwise |
/// | `duration` | lenient time-delta parsing; numbers are seconds |
/// | `category` | dictionary encoding of the display label |
/// | `complex` | complex literals; numbers become the real part |
pub fn coerce_to_tag(values: Vec<Value>, tag: TypeTag) -> Vec<Value> {
    match tag {
        TypeTag::Object => values,
        TypeTag::Category => dictionary_encode(&values),
        TypeTag::Int8
        | TypeTag::Int16
        | TypeTag::Int32
        | TypeTag::Int64
        | TypeTag::Float32
        | TypeTag::Float64 => values
            .iter()
            .map(|v| parse_number(v).map(|n| cast_number(n, tag)).unwrap_or(Value::Null))
            .collect(),
        TypeTag::Bool => values.iter().map(|v| or_null(to_bool(v).map(Value::Bool))).collect(),
        TypeTag::Datetime => values.iter().map(|v| or_null(to_datetime(v))).collect(),
        TypeTag::Duration => values.iter().map(|v| or_null(to_duration(v))).collect(),
        TypeTag::Complex => values
            .iter()
            .map(|v| or_null(to_complex(v).filter(|c| !c.is_nan()).map(Value::Complex)))
            .collect(),
    }
}

fn or_null(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => {
            if let Some(b) = other.as_text().and_then(lookup_bool_alias) {
                return Some(b);
            }
            parse_number(other).map(|n| n.as_f64() != 0.0)
        }
    }
}

fn to_datetime(value: &Value) -> Option<Value> {
    if let Value::DateTime(dt) = value {
        return Some(Value::DateTime(*dt));
    }
    if let Some(dt) = value.as_text().and_then(parse_calendar) {
        return Some(Value::DateTime(dt));
    }
    let whole = parse_number(value)?.as_whole()?;
    let epoch = i64::try_from(whole).ok()?;
    let dt = if digit_count(whole.unsigned_abs()) == 13 {
        from_epoch_millis(epoch)
    } else {
        from_epoch_seconds(epoch)
    };
    dt.map(Value::DateTime)
}

fn to_duration(value: &Value) -> Option<Value> {
    match value {
        Value::Duration(d) => Some(Value::Duration(*d)),
        Value::Utf8(_) | Value::Category(_) => value.as_text().and_then(parse_timedelta).map(Value::Duration),
        other => parse_number(other)
            .and_then(|n| seconds_to_timedelta(n.as_f64()))
            .map(Value::Duration),
    }
}

fn to_complex(value: &Value) -> Option<Complex> {
    match value {
        Value::Complex(c) => Some(*c),
        Value::Utf8(_) | Value::Category(_) => value.as_text().and_then(parse_complex),
        other => parse_number(other).map(|n| Complex::new(n.as_f64(), 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeDelta};

    use super::{coerce_to_tag, resolve_hint, HintOutcome};
    use crate::types::{Complex, TypeTag, Value};

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::Utf8((*v).to_string())).collect()
    }

    #[test]
    fn bool_hint_coerces_numeric_looking_values() {
        let out = coerce_to_tag(strings(&["1", "0", "yes", "2", "banana"]), TypeTag::Bool);
        assert_eq!(
            out,
            vec![
                Value::Bool(true),
                Value::Bool(false),
                Value::Bool(true),
                Value::Bool(true),
                Value::Null,
            ]
        );
    }

    #[test]
    fn integer_hints_drop_out_of_range_and_fractional_values() {
        let out = coerce_to_tag(strings(&["12", "300", "1.5", "x", "-128"]), TypeTag::Int8);
        assert_eq!(
            out,
            vec![Value::Int8(12), Value::Null, Value::Null, Value::Null, Value::Int8(-128)]
        );
    }

    #[test]
    fn float_hints_cast() {
        let out = coerce_to_tag(vec![Value::Int64(2), Value::Utf8("1.25".into())], TypeTag::Float64);
        assert_eq!(out, vec![Value::Float64(2.0), Value::Float64(1.25)]);
        let out = coerce_to_tag(strings(&["1e300"]), TypeTag::Float32);
        assert_eq!(out, vec![Value::Null]);
    }

    #[test]
    fn datetime_hint_parses_calendar_and_epochs() {
        let out = coerce_to_tag(
            vec![
                Value::Utf8("2024-01-02".into()),
                Value::Int64(1_700_000_000),
                Value::Int64(1_700_000_000_000),
                Value::Utf8("nope".into()),
            ],
            TypeTag::Datetime,
        );
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let epoch = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap().and_hms_opt(22, 13, 20).unwrap();
        assert_eq!(
            out,
            vec![
                Value::DateTime(jan2),
                Value::DateTime(epoch),
                Value::DateTime(epoch),
                Value::Null,
            ]
        );
    }

    #[test]
    fn duration_hint_is_lenient() {
        let out = coerce_to_tag(
            vec![Value::Utf8("1 days 01:00:00".into()), Value::Int64(30), Value::Utf8("later".into())],
            TypeTag::Duration,
        );
        assert_eq!(
            out,
            vec![
                Value::Duration(TimeDelta::seconds(90_000)),
                Value::Duration(TimeDelta::seconds(30)),
                Value::Null,
            ]
        );
    }

    #[test]
    fn category_and_complex_hints() {
        let out = coerce_to_tag(vec![Value::Int64(1), Value::Null], TypeTag::Category);
        assert_eq!(out, vec![Value::Category(Arc::from("1")), Value::Null]);

        let out = coerce_to_tag(vec![Value::Utf8("1+1j".into()), Value::Float64(2.5)], TypeTag::Complex);
        assert_eq!(
            out,
            vec![Value::Complex(Complex::new(1.0, 1.0)), Value::Complex(Complex::new(2.5, 0.0))]
        );
    }

    #[test]
    fn object_hint_is_a_no_op() {
        let input = strings(&["1", "unknown"]);
        assert_eq!(coerce_to_tag(input.clone(), TypeTag::Object), input);
    }

    #[test]
    fn unknown_tags_leave_values_unchanged() {
        let input = strings(&["1"]);
        assert_eq!(
            resolve_hint(input.clone(), "decimal(10,2)"),
            HintOutcome::UnknownTag { values: input }
        );
        assert!(matches!(
            resolve_hint(strings(&["1"]), "INT16"),
            HintOutcome::Applied { tag: TypeTag::Int16, .. }
        ));
    }
}
