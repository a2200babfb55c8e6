//! Complex-number detection.

use crate::inference::parse::parse_complex;
use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

/// Matches string values that parse as complex literals once whitespace is removed.
///
/// Non-string values (other than existing complex values) and unparsable strings become
/// missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexDetector;

impl Detector for ComplexDetector {
    fn name(&self) -> &'static str {
        "complex"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        let out = values
            .iter()
            .map(|value| {
                let parsed = match value {
                    Value::Complex(c) => Some(*c),
                    other => other.as_text().and_then(parse_complex),
                };
                parsed
                    .filter(|c| !c.is_nan())
                    .map(Value::Complex)
                    .unwrap_or(Value::Null)
            })
            .collect();
        Detection::unless_all_missing(TypeTag::Complex, out)
    }
}

#[cfg(test)]
mod tests {
    use super::ComplexDetector;
    use crate::inference::detectors::test_support::strings;
    use crate::inference::detectors::{Detection, Detector};
    use crate::types::{Complex, TypeTag, Value};

    #[test]
    fn complex_literals_match() {
        let out = ComplexDetector.detect(&strings(&["1 + 2j", "3-4j", "oops"]));
        assert_eq!(
            out,
            Detection::Matched {
                tag: TypeTag::Complex,
                values: vec![
                    Value::Complex(Complex::new(1.0, 2.0)),
                    Value::Complex(Complex::new(3.0, -4.0)),
                    Value::Null,
                ],
            }
        );
    }

    #[test]
    fn numbers_are_not_complex_candidates() {
        assert_eq!(ComplexDetector.detect(&[Value::Int64(1), Value::Float64(2.0)]), Detection::NoMatch);
    }

    #[test]
    fn nan_parts_do_not_count() {
        assert_eq!(ComplexDetector.detect(&strings(&["nan+1j"])), Detection::NoMatch);
    }
}
