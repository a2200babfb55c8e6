//! `rust-type-inference` infers the semantic type of every column in an in-memory
//! [`types::DataSet`] and coerces the column's values to that type, or to an explicit type
//! requested through a type hint.
//!
//! The primary entrypoint is [`execution::InferenceEngine::run`]; [`infer_and_convert`] runs it
//! with default options.
//!
//! ## What gets inferred
//!
//! Each column without a hint is cleaned (sentinel tokens such as `"Not Available"` and
//! `"unknown"` become missing) and then offered to an ordered chain of detectors. The first one
//! that accepts the column decides its type:
//!
//! 1. **duration**: `"2 hours"`, `"1 day"`, `"30 minutes"`
//! 2. **bool**: `yes/no`, `true/false`, `on/off`, `enabled/disabled`, numeric `0/1`
//! 3. **datetime**: calendar strings, or 10/13-digit epoch seconds/milliseconds
//! 4. **numeric**: the narrowest of `int8..int64`, else `float32`/`float64`
//! 5. **complex**: `"1+2j"`, `"3 - 1j"`
//! 6. **category**: when fewer than half of the values are distinct
//! 7. **object**: everything else, left as-is
//!
//! Values that cannot be converted become [`types::Value::Null`]; row positions never move.
//!
//! ## Quick example
//!
//! ```rust
//! use rust_type_inference::infer_and_convert;
//! use rust_type_inference::types::{Column, DataSet, TypeTag, Value};
//!
//! # fn main() -> Result<(), rust_type_inference::InferenceError> {
//! let text = |v: &[&str]| v.iter().map(|s| Value::Utf8(s.to_string())).collect::<Vec<_>>();
//! let mut ds = DataSet::new(
//!     "upload",
//!     vec![
//!         Column::new("flag", text(&["Yes", "no", "ENABLED"])),
//!         Column::new("n", text(&["1", "2", "3000000000000"])),
//!     ],
//! )?;
//!
//! let report = infer_and_convert(&mut ds)?;
//! assert_eq!(report.get("flag"), Some(TypeTag::Bool));
//! assert_eq!(report.get("n"), Some(TypeTag::Int64));
//! assert_eq!(ds.columns[0].values[2], Value::Bool(true));
//! # Ok(())
//! # }
//! ```
//!
//! ## Type hints
//!
//! A hint bypasses detection and coerces the column straight to the requested tag. Tags come from
//! the fixed vocabulary in [`inference::supported_types`]; an unknown tag leaves the column
//! unchanged.
//!
//! ```rust
//! use rust_type_inference::execution::{InferenceEngine, InferenceOptions};
//! use rust_type_inference::types::{Column, DataSet, TypeTag, Value};
//!
//! # fn main() -> Result<(), rust_type_inference::InferenceError> {
//! let mut ds = DataSet::new(
//!     "upload",
//!     vec![Column::new("id", vec![Value::Utf8("7".into()), Value::Utf8("x".into())])],
//! )?
//! .with_type_hints([("id", Some("int32"))]);
//!
//! let engine = InferenceEngine::new(InferenceOptions::default())?;
//! let report = engine.run(&mut ds);
//! assert_eq!(report.get("id"), Some(TypeTag::Int32));
//! assert_eq!(ds.columns[0].values, vec![Value::Int32(7), Value::Null]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: dataset, column, value and type tag types
//! - [`inference`]: cleaning, detectors, hint coercion and the type report
//! - [`execution`]: the parallel column dispatcher, options and observability
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod inference;
pub mod types;

pub use error::{InferenceError, InferenceResult};
pub use execution::{infer_and_convert, InferenceEngine, InferenceOptions};
pub use inference::TypeReport;
pub use types::TypeTag;
