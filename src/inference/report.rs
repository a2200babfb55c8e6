//! Per-column type summary.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::TypeTag;

/// Names of every supported type tag, in catalog order.
///
/// This is the same vocabulary hints accept and inference produces.
pub fn supported_types() -> Vec<&'static str> {
    TypeTag::ALL.iter().map(|t| t.as_str()).collect()
}

/// Final type tag of every column, in dataset column order.
///
/// Serializes as a JSON object `{"column": "tag", ...}` preserving column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeReport {
    entries: Vec<(String, TypeTag)>,
}

impl TypeReport {
    pub fn new(entries: Vec<(String, TypeTag)>) -> Self {
        Self { entries }
    }

    /// Tag of a column, if present.
    pub fn get(&self, column: &str) -> Option<TypeTag> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, tag)| *tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.entries.iter().map(|(name, tag)| (name.as_str(), *tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(column, tag name)` pairs.
    pub fn to_string_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(name, tag)| (name.to_owned(), tag.as_str().to_owned()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for TypeReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, tag) in &self.entries {
            map.serialize_entry(name, tag)?;
        }
        map.end()
    }
}

impl fmt::Display for TypeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (i, (name, tag)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name:<width$}  {tag}")?;
        }
        Ok(())
    }
}
