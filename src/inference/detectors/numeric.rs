//! Numeric detection with width minimization.

use crate::inference::parse::{parse_number, Number};
use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

/// Values with an absolute maximum at or below this fit `float32`.
const FLOAT32_MAX_ABS: f64 = 3.4e38;

/// Matches columns where at least one value is numeric, choosing the narrowest width.
///
/// - any non-integral value: `float32` if the absolute maximum is at most 3.4e38, else `float64`
/// - all integral: the first of `int8`, `int16`, `int32`, `int64` covering `[min, max]`, else
///   `float64`
///
/// Values that are not numeric become missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericDetector;

impl Detector for NumericDetector {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        let parsed: Vec<Option<Number>> = values.iter().map(parse_number).collect();
        let Some(tag) = narrowest_tag(parsed.iter().flatten().copied()) else {
            return Detection::NoMatch;
        };

        let out = parsed
            .into_iter()
            .map(|n| n.map(|n| cast_number(n, tag)).unwrap_or(Value::Null))
            .collect();
        Detection::Matched { tag, values: out }
    }
}

/// The narrowest numeric tag that holds every number, or `None` for no numbers.
pub fn narrowest_tag(numbers: impl Iterator<Item = Number>) -> Option<TypeTag> {
    let mut any = false;
    let mut integral = true;
    let mut beyond_i128 = false;
    let mut min = i128::MAX;
    let mut max = i128::MIN;
    let mut max_abs = 0.0_f64;

    for n in numbers {
        any = true;
        max_abs = max_abs.max(n.as_f64().abs());
        if !n.is_integral() {
            integral = false;
            continue;
        }
        match n.as_whole() {
            Some(w) => {
                min = min.min(w);
                max = max.max(w);
            }
            None => beyond_i128 = true,
        }
    }

    if !any {
        return None;
    }
    if !integral {
        return Some(if max_abs <= FLOAT32_MAX_ABS {
            TypeTag::Float32
        } else {
            TypeTag::Float64
        });
    }
    if beyond_i128 {
        return Some(TypeTag::Float64);
    }
    Some(integer_width(min, max))
}

fn integer_width(min: i128, max: i128) -> TypeTag {
    let fits = |lo: i128, hi: i128| min >= lo && max <= hi;
    if fits(i8::MIN.into(), i8::MAX.into()) {
        TypeTag::Int8
    } else if fits(i16::MIN.into(), i16::MAX.into()) {
        TypeTag::Int16
    } else if fits(i32::MIN.into(), i32::MAX.into()) {
        TypeTag::Int32
    } else if fits(i64::MIN.into(), i64::MAX.into()) {
        TypeTag::Int64
    } else {
        TypeTag::Float64
    }
}

/// Cast one number to a numeric tag; values that do not fit become missing.
pub fn cast_number(n: Number, tag: TypeTag) -> Value {
    let whole = n.as_whole();
    let value = match tag {
        TypeTag::Int8 => whole.and_then(|w| i8::try_from(w).ok()).map(Value::Int8),
        TypeTag::Int16 => whole.and_then(|w| i16::try_from(w).ok()).map(Value::Int16),
        TypeTag::Int32 => whole.and_then(|w| i32::try_from(w).ok()).map(Value::Int32),
        TypeTag::Int64 => whole.and_then(|w| i64::try_from(w).ok()).map(Value::Int64),
        TypeTag::Float32 => {
            let v = n.as_f64();
            (!v.is_finite() || v.abs() <= f64::from(f32::MAX)).then(|| Value::Float32(v as f32))
        }
        TypeTag::Float64 => Some(Value::Float64(n.as_f64())),
        _ => None,
    };
    value.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::NumericDetector;
    use crate::inference::detectors::test_support::strings;
    use crate::inference::detectors::{Detection, Detector};
    use crate::types::{TypeTag, Value};

    fn tag_of(values: &[&str]) -> Option<TypeTag> {
        match NumericDetector.detect(&strings(values)) {
            Detection::Matched { tag, .. } => Some(tag),
            Detection::NoMatch => None,
        }
    }

    #[test]
    fn integer_width_boundaries() {
        assert_eq!(tag_of(&["-128", "127"]), Some(TypeTag::Int8));
        assert_eq!(tag_of(&["0", "128"]), Some(TypeTag::Int16));
        assert_eq!(tag_of(&["-129"]), Some(TypeTag::Int16));
        assert_eq!(tag_of(&["32767"]), Some(TypeTag::Int16));
        assert_eq!(tag_of(&["32768"]), Some(TypeTag::Int32));
        assert_eq!(tag_of(&["-2147483648", "2147483647"]), Some(TypeTag::Int32));
        assert_eq!(tag_of(&["2147483648"]), Some(TypeTag::Int64));
        assert_eq!(tag_of(&["9223372036854775807"]), Some(TypeTag::Int64));
        assert_eq!(tag_of(&["9223372036854775808"]), Some(TypeTag::Float64));
    }

    #[test]
    fn float_width_by_magnitude() {
        assert_eq!(tag_of(&["1.5", "2"]), Some(TypeTag::Float32));
        assert_eq!(tag_of(&["1.5", "3.4e38"]), Some(TypeTag::Float32));
        assert_eq!(tag_of(&["1.5", "3.5e38"]), Some(TypeTag::Float64));
    }

    #[test]
    fn integral_values_beyond_int64_fall_back_to_float64() {
        assert_eq!(tag_of(&["1e38", "2"]), Some(TypeTag::Float64));
        assert_eq!(
            tag_of(&["200000000000000000000000000000000000000", "1"]),
            Some(TypeTag::Float64)
        );
        let typed = vec![Value::Float64(2e38), Value::Float64(3.0)];
        assert_eq!(
            NumericDetector.detect(&typed),
            Detection::Matched {
                tag: TypeTag::Float64,
                values: typed.clone(),
            }
        );
    }

    #[test]
    fn below_int64_min_rounds_onto_int64_on_a_second_pass() {
        let first = NumericDetector.detect(&strings(&["-9223372036854775809", "1"]));
        let Detection::Matched { tag, values } = first else {
            panic!("expected a numeric match");
        };
        assert_eq!(tag, TypeTag::Float64);
        assert_eq!(values[0], Value::Float64(i64::MIN as f64));

        let second = NumericDetector.detect(&values);
        assert!(matches!(second, Detection::Matched { tag: TypeTag::Int64, .. }));
    }

    #[test]
    fn integral_floats_count_as_integers() {
        assert_eq!(tag_of(&["1.0", "2.0"]), Some(TypeTag::Int8));
    }

    #[test]
    fn unparsable_values_become_missing() {
        let out = NumericDetector.detect(&strings(&["1", "x", "300"]));
        assert_eq!(
            out,
            Detection::Matched {
                tag: TypeTag::Int16,
                values: vec![Value::Int16(1), Value::Null, Value::Int16(300)],
            }
        );
    }

    #[test]
    fn no_numbers_is_no_match() {
        assert_eq!(tag_of(&["a", "b"]), None);
    }

    #[test]
    fn typed_numbers_keep_their_width() {
        let narrow = vec![Value::Int8(3), Value::Int8(-4)];
        assert_eq!(
            NumericDetector.detect(&narrow),
            Detection::Matched {
                tag: TypeTag::Int8,
                values: narrow.clone(),
            }
        );
        let floats = vec![Value::Float32(1.1), Value::Float32(2.5)];
        assert_eq!(
            NumericDetector.detect(&floats),
            Detection::Matched {
                tag: TypeTag::Float32,
                values: floats.clone(),
            }
        );
    }
}
