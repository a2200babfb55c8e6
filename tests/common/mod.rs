#![allow(dead_code)]

use std::path::Path;

use rust_type_inference::types::{Column, DataSet, Value};

/// Load a CSV file the way an upload handler would hand it over: empty cells are null, integers
/// are `Int64`, decimals are `Float64`, everything else stays a string.
pub fn load_fixture(name: &str) -> DataSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .unwrap_or_else(|e| panic!("open {}: {e}", path.display()));

    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record.unwrap();
        for (idx, cell) in record.iter().enumerate() {
            columns[idx].push(cell_value(cell));
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    DataSet::new(name.trim_end_matches(".csv"), columns).unwrap()
}

pub fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else if let Ok(v) = cell.parse::<i64>() {
        Value::Int64(v)
    } else if let Ok(v) = cell.parse::<f64>() {
        Value::Float64(v)
    } else {
        Value::Utf8(cell.to_owned())
    }
}

pub fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::Utf8((*v).to_string())).collect()
}

pub fn dataset(columns: Vec<(&str, Vec<Value>)>) -> DataSet {
    DataSet::new(
        "test",
        columns.into_iter().map(|(n, v)| Column::new(n, v)).collect(),
    )
    .unwrap()
}
