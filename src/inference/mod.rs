//! Type inference and coercion for single columns.
//!
//! The pieces, leaf-first:
//!
//! - [`clean`]: drops sentinel tokens and missing cells, remembering row positions
//! - [`detectors`]: the ordered [`DetectorChain`]
//! - [`hints`]: direct coercion for columns with an explicit type tag
//! - [`report`]: the per-column [`TypeReport`]
//!
//! [`crate::execution::InferenceEngine`] applies these to every column of a
//! [`crate::types::DataSet`]. [`infer_column`] is the unit of work it runs per unhinted column.
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use rust_type_inference::inference::{infer_column, DetectorChain};
//! use rust_type_inference::types::{TypeTag, Value};
//!
//! let chain = DetectorChain::standard(0.5);
//! let sentinels: HashSet<String> = ["unknown".to_string()].into_iter().collect();
//! let values = vec![
//!     Value::Utf8("Yes".into()),
//!     Value::Utf8("unknown".into()),
//!     Value::Utf8("off".into()),
//! ];
//!
//! let inferred = infer_column(values, &sentinels, &chain);
//! assert_eq!(inferred.tag, TypeTag::Bool);
//! assert_eq!(inferred.values, vec![Value::Bool(true), Value::Null, Value::Bool(false)]);
//! ```

pub mod clean;
pub mod detectors;
pub mod hints;
pub mod parse;
pub mod report;

use std::collections::HashSet;

use crate::types::{TypeTag, Value};

pub use clean::{clean_column, CleanedColumn, DEFAULT_SENTINELS};
pub use detectors::{ChainMatch, Detection, Detector, DetectorChain};
pub use hints::{coerce_to_tag, resolve_hint, HintOutcome};
pub use report::{supported_types, TypeReport};

/// Inference result for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInference {
    /// Applied tag; [`TypeTag::Object`] when no detector matched.
    pub tag: TypeTag,
    /// Coerced values at their original row positions.
    pub values: Vec<Value>,
    /// Detector that matched, if any.
    pub detector: Option<&'static str>,
}

/// Clean a column, run the detector chain and realign the result to the original rows.
pub fn infer_column(values: Vec<Value>, sentinels: &HashSet<String>, chain: &DetectorChain) -> ColumnInference {
    let cleaned = clean_column(values, sentinels);
    match chain.run(&cleaned.values) {
        Some(m) => ColumnInference {
            tag: m.tag,
            values: cleaned.reindex(m.values),
            detector: Some(m.detector),
        },
        None => ColumnInference {
            tag: TypeTag::Object,
            values: cleaned.into_original_positions(),
            detector: None,
        },
    }
}
