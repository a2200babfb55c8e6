//! Sentinel cleaning and row realignment.

use std::collections::HashSet;

use crate::types::Value;

/// Placeholder strings treated as missing data unless the caller configures otherwise.
pub const DEFAULT_SENTINELS: &[&str] = &["Not Available", "unknown"];

/// The surviving cells of a column after cleaning, with the row each one came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedColumn {
    /// Original row index of each surviving value.
    pub rows: Vec<usize>,
    /// Surviving values, in row order.
    pub values: Vec<Value>,
    /// Row count of the column before cleaning.
    pub original_len: usize,
}

impl CleanedColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scatter `values` (one per surviving row) back onto the original row positions.
    ///
    /// Rows removed by cleaning become [`Value::Null`].
    pub fn reindex(&self, values: Vec<Value>) -> Vec<Value> {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut out = vec![Value::Null; self.original_len];
        for (row, value) in self.rows.iter().zip(values) {
            out[*row] = value;
        }
        out
    }

    /// Reindex the surviving values themselves, unconverted.
    pub fn into_original_positions(self) -> Vec<Value> {
        let mut out = vec![Value::Null; self.original_len];
        for (row, value) in self.rows.into_iter().zip(self.values) {
            out[row] = value;
        }
        out
    }
}

/// Drop sentinel strings (exact match) and missing values from a column.
pub fn clean_column(values: Vec<Value>, sentinels: &HashSet<String>) -> CleanedColumn {
    let original_len = values.len();
    let mut rows = Vec::with_capacity(original_len);
    let mut kept = Vec::with_capacity(original_len);

    for (row, value) in values.into_iter().enumerate() {
        let is_sentinel = matches!(&value, Value::Utf8(s) if sentinels.contains(s));
        if is_sentinel || value.is_missing() {
            continue;
        }
        rows.push(row);
        kept.push(value);
    }

    CleanedColumn {
        rows,
        values: kept,
        original_len,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{clean_column, DEFAULT_SENTINELS};
    use crate::types::Value;

    fn sentinels() -> HashSet<String> {
        DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clean_drops_sentinels_and_nulls_but_remembers_rows() {
        let values = vec![
            Value::Utf8("a".into()),
            Value::Utf8("Not Available".into()),
            Value::Null,
            Value::Utf8("b".into()),
            Value::Utf8("unknown".into()),
            Value::Float64(f64::NAN),
        ];
        let cleaned = clean_column(values, &sentinels());
        assert_eq!(cleaned.rows, vec![0, 3]);
        assert_eq!(cleaned.values, vec![Value::Utf8("a".into()), Value::Utf8("b".into())]);
        assert_eq!(cleaned.original_len, 6);
    }

    #[test]
    fn sentinel_match_is_exact() {
        let values = vec![Value::Utf8("Unknown".into()), Value::Utf8("not available".into())];
        let cleaned = clean_column(values, &sentinels());
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn reindex_fills_dropped_rows_with_null() {
        let values = vec![Value::Null, Value::Utf8("1".into()), Value::Utf8("unknown".into()), Value::Utf8("2".into())];
        let cleaned = clean_column(values, &sentinels());
        let out = cleaned.reindex(vec![Value::Int8(1), Value::Int8(2)]);
        assert_eq!(out, vec![Value::Null, Value::Int8(1), Value::Null, Value::Int8(2)]);
    }
}
