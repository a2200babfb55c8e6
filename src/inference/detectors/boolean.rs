//! Boolean detection.

use crate::inference::parse::lookup_bool_alias;
use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

/// Matches columns whose every value reads as a boolean.
///
/// - native booleans pass through
/// - strings are looked up (case-insensitive) in the true/false alias tables
/// - numbers (`Int64`/`Float64`, as produced by ingestion) equal to 0 or 1 map to false/true
///
/// Any other value is left as-is, which makes the nullable-boolean cast of the column fail, so
/// the detector declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDetector;

impl Detector for BooleanDetector {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match to_bool(value) {
                Some(b) => out.push(Value::Bool(b)),
                None => return Detection::NoMatch,
            }
        }
        Detection::unless_all_missing(TypeTag::Bool, out)
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int64(0) => Some(false),
        Value::Int64(1) => Some(true),
        Value::Float64(v) if *v == 0.0 => Some(false),
        Value::Float64(v) if *v == 1.0 => Some(true),
        other => other.as_text().and_then(lookup_bool_alias),
    }
}
