//! Core data model for inference.
//!
//! A [`DataSet`] is column-major: an ordered list of named [`Column`]s whose cells are
//! dynamically-typed [`Value`]s. A cell's row index is its position in [`Column::values`]; every
//! stage of the engine preserves that position.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, InferenceResult};

/// Semantic type assigned to a column, either inferred or requested through a hint.
///
/// The same closed vocabulary is accepted by hints, produced by inference and listed by
/// [`crate::inference::supported_types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Unconverted values.
    Object,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Boolean (nullable).
    Bool,
    /// Naive calendar timestamp.
    Datetime,
    /// Elapsed time.
    Duration,
    /// Small repeated value set, dictionary encoded.
    Category,
    /// Real + imaginary pair.
    Complex,
}

impl TypeTag {
    /// Every tag, in catalog order.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::Object,
        TypeTag::Int64,
        TypeTag::Int32,
        TypeTag::Int16,
        TypeTag::Int8,
        TypeTag::Float64,
        TypeTag::Float32,
        TypeTag::Bool,
        TypeTag::Datetime,
        TypeTag::Duration,
        TypeTag::Category,
        TypeTag::Complex,
    ];

    /// Wire name of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Object => "object",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
            TypeTag::Bool => "bool",
            TypeTag::Datetime => "datetime",
            TypeTag::Duration => "duration",
            TypeTag::Category => "category",
            TypeTag::Complex => "complex",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = InferenceError;

    /// Parse a tag name (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| InferenceError::UnknownTypeTag { tag: s.to_owned() })
    }
}

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// True if either part is NaN.
    pub fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}j", self.re, -self.im)
        } else {
            write!(f, "{}+{}j", self.re, self.im)
        }
    }
}

/// A single cell value.
///
/// Ingestion produces the "raw" variants: [`Value::Null`], [`Value::Utf8`], [`Value::Int64`],
/// [`Value::Float64`] and [`Value::Bool`]. The remaining variants are only produced by coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// UTF-8 string.
    Utf8(String),
    /// Boolean.
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Naive timestamp (UTC when derived from an offset or an epoch).
    DateTime(NaiveDateTime),
    /// Elapsed time.
    Duration(TimeDelta),
    /// Dictionary-encoded label; equal labels in one column share storage.
    Category(Arc<str>),
    Complex(Complex),
}

impl Value {
    /// Null, or a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float32(v) => v.is_nan(),
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Textual payload of string-like values ([`Value::Utf8`] and [`Value::Category`]).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            Value::Category(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Utf8(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Duration(d) => write!(f, "{}s", d.num_milliseconds() as f64 / 1_000.0),
            Value::Category(s) => f.write_str(s),
            Value::Complex(c) => write!(f, "{c}"),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (unique within a [`DataSet`]).
    pub name: String,
    /// Cells in row order.
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Caller-requested type for one column.
///
/// The tag is kept as the caller sent it so that unrecognized tags can be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    pub column: String,
    pub tag: String,
}

impl TypeHint {
    pub fn new(column: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            tag: tag.into(),
        }
    }
}

/// In-memory tabular dataset, constructed once per upload and coerced in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Dataset name (typically the uploaded file name).
    pub name: String,
    /// Ordered columns.
    pub columns: Vec<Column>,
    /// Ordered type hints. Later hints for the same column win.
    pub type_hints: Vec<TypeHint>,
}

impl DataSet {
    /// Create a dataset from columns.
    ///
    /// Column names must be unique and all columns must have the same length.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> InferenceResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(InferenceError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(InferenceError::ColumnLengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            columns,
            type_hints: Vec::new(),
        })
    }

    /// Attach type hints, dropping entries whose tag is `None`.
    pub fn with_type_hints<I, S, T>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<T>)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.type_hints = hints
            .into_iter()
            .filter_map(|(column, tag)| tag.map(|t| TypeHint::new(column, t)))
            .collect();
        self
    }

    /// Number of rows (zero for a dataset without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
