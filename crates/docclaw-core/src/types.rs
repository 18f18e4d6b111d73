//! Plain data types shared across the workspace.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A small variant value carried in entry metadata.
///
/// The metadata side channel is typed as a closed set of scalar shapes
/// rather than open-ended JSON — enough for page numbers, source names,
/// and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Optional per-entry metadata mapping.
pub type Metadata = HashMap<String, MetaValue>;

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Number(n)
    }
}

impl From<usize> for MetaValue {
    fn from(n: usize) -> Self {
        MetaValue::Number(n as f64)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_value_from() {
        assert_eq!(MetaValue::from("page"), MetaValue::Text("page".into()));
        assert_eq!(MetaValue::from(3usize), MetaValue::Number(3.0));
        assert_eq!(MetaValue::from(true), MetaValue::Bool(true));
    }

    #[test]
    fn test_meta_value_serializes_untagged() {
        let mut meta = Metadata::new();
        meta.insert("page".into(), MetaValue::from(2usize));
        meta.insert("source".into(), MetaValue::from("manual.txt"));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["page"], 2.0);
        assert_eq!(json["source"], "manual.txt");
    }
}
