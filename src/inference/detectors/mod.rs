//! The ordered detector chain.
//!
//! Each [`Detector`] looks at the cleaned values of one column and either returns a fully
//! coerced column ([`Detection::Matched`]) or [`Detection::NoMatch`]. Detectors never fail:
//! values they cannot parse are either missing in the output or make the detector decline.
//!
//! [`DetectorChain::standard`] evaluates, in order:
//!
//! 1. [`DurationDetector`]
//! 2. [`BooleanDetector`]
//! 3. [`DatetimeDetector`]
//! 4. [`NumericDetector`]
//! 5. [`ComplexDetector`]
//! 6. [`CategoricalDetector`]
//!
//! The first match wins.

pub mod boolean;
pub mod categorical;
pub mod complex;
pub mod datetime;
pub mod duration;
pub mod numeric;

use std::fmt;

use crate::types::{TypeTag, Value};

pub use boolean::BooleanDetector;
pub use categorical::{dictionary_encode, CategoricalDetector};
pub use complex::ComplexDetector;
pub use datetime::DatetimeDetector;
pub use duration::DurationDetector;
pub use numeric::NumericDetector;

/// Outcome of running one detector over a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// The column has this type; `values` has one entry per input value.
    Matched { tag: TypeTag, values: Vec<Value> },
    /// The detector does not apply; try the next one.
    NoMatch,
}

impl Detection {
    /// `Matched` if at least one produced value is present, `NoMatch` otherwise.
    pub(crate) fn unless_all_missing(tag: TypeTag, values: Vec<Value>) -> Self {
        if values.iter().all(Value::is_missing) {
            Detection::NoMatch
        } else {
            Detection::Matched { tag, values }
        }
    }
}

/// A single type-specific parser/coercer.
pub trait Detector: Send + Sync {
    /// Short name used in events and logs.
    fn name(&self) -> &'static str;

    /// Inspect cleaned (sentinel- and null-free) values.
    fn detect(&self, values: &[Value]) -> Detection;
}

/// A match produced by [`DetectorChain::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainMatch {
    /// Name of the detector that matched.
    pub detector: &'static str,
    pub tag: TypeTag,
    pub values: Vec<Value>,
}

/// Ordered list of detectors; the first match wins.
pub struct DetectorChain {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorChain {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// The standard chain, with the given categorical threshold.
    pub fn standard(categorical_threshold: f64) -> Self {
        Self::new(vec![
            Box::new(DurationDetector),
            Box::new(BooleanDetector),
            Box::new(DatetimeDetector),
            Box::new(NumericDetector),
            Box::new(ComplexDetector),
            Box::new(CategoricalDetector::new(categorical_threshold)),
        ])
    }

    /// Detector names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run detectors in order and return the first match.
    ///
    /// An empty column matches nothing.
    pub fn run(&self, values: &[Value]) -> Option<ChainMatch> {
        if values.is_empty() {
            return None;
        }
        self.detectors.iter().find_map(|detector| match detector.detect(values) {
            Detection::Matched { tag, values } => Some(ChainMatch {
                detector: detector.name(),
                tag,
                values,
            }),
            Detection::NoMatch => None,
        })
    }
}

impl fmt::Debug for DetectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorChain")
            .field("detectors", &self.names())
            .finish()
    }
}
