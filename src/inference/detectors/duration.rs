//! Duration detection (`"2 hours"`, `"1 week"`, ...).

use crate::inference::parse::parse_duration_literal;
use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

/// Matches `<number><optional whitespace><unit word>` strings.
///
/// Values that are already durations pass through; anything else becomes missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationDetector;

impl Detector for DurationDetector {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        let out = values
            .iter()
            .map(|value| match value {
                Value::Duration(d) => Value::Duration(*d),
                other => other
                    .as_text()
                    .and_then(parse_duration_literal)
                    .map(Value::Duration)
                    .unwrap_or(Value::Null),
            })
            .collect();
        Detection::unless_all_missing(TypeTag::Duration, out)
    }
}
