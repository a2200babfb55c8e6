//! Categorical detection and dictionary encoding.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::types::{TypeTag, Value};

use super::{Detection, Detector};

/// Matches columns with few distinct values: `distinct / total < threshold` (strict).
#[derive(Debug, Clone, Copy)]
pub struct CategoricalDetector {
    threshold: f64,
}

impl CategoricalDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for CategoricalDetector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Detector for CategoricalDetector {
    fn name(&self) -> &'static str {
        "categorical"
    }

    fn detect(&self, values: &[Value]) -> Detection {
        if values.is_empty() {
            return Detection::NoMatch;
        }
        let labels: Vec<String> = values.iter().map(Value::to_string).collect();
        let distinct = labels.iter().map(String::as_str).collect::<HashSet<_>>().len();
        let ratio = distinct as f64 / values.len() as f64;
        if ratio < self.threshold {
            Detection::Matched {
                tag: TypeTag::Category,
                values: encode_labels(labels.iter().map(|l| Some(l.as_str()))),
            }
        } else {
            Detection::NoMatch
        }
    }
}

/// Dictionary-encode values by their display label. Missing values stay missing.
pub fn dictionary_encode(values: &[Value]) -> Vec<Value> {
    let labels: Vec<Option<String>> = values
        .iter()
        .map(|v| (!v.is_missing()).then(|| v.to_string()))
        .collect();
    encode_labels(labels.iter().map(Option::as_deref))
}

fn encode_labels<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<Value> {
    let mut dictionary: HashMap<&'a str, Arc<str>> = HashMap::new();
    labels
        .map(|label| match label {
            Some(l) => Value::Category(Arc::clone(
                dictionary.entry(l).or_insert_with(|| Arc::from(l)),
            )),
            None => Value::Null,
        })
        .collect()
}
