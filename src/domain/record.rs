// ==========================================
// Wood QC Report - Raw record model
// ==========================================
// Responsibility: one spreadsheet row as typed by the laboratory,
// free-text keys in their original column order
// Lifecycle: produced once per report request, never mutated by the engine
// ==========================================

use serde::Serialize;
use std::fmt;

/// Text values that spreadsheets and dataframe exports use for "no value".
const EMPTY_SENTINELS: &[&str] = &["nat", "none", "nan", "null"];

// ==========================================
// RawValue - heterogeneous cell value
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Empty,
    Number(f64),
    Text(String),
}

/// Shared empty value handed out for absent fields.
pub static EMPTY_VALUE: RawValue = RawValue::Empty;

impl RawValue {
    /// Build a text value; blank text collapses to `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value)
        }
    }

    /// True for missing cells, blank text, NaN and the usual "NaT"/"None" exports.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Number(n) => n.is_nan(),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty()
                    || EMPTY_SENTINELS
                        .iter()
                        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
            }
        }
    }

    /// Trimmed textual form; empty values give an empty string.
    pub fn as_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            RawValue::Empty => String::new(),
            RawValue::Number(n) => format_plain_number(*n),
            RawValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Empty
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::text(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Empty)
    }
}

/// Integers print without a fractional part ("123" rather than "123.0").
fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ==========================================
// RawRecord - insertion-ordered field mapping
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRecord {
    entries: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (key, value) pairs, keeping their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert(key, value);
        }
        record
    }

    /// Insert a value; an existing identical key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every value is empty (blank spreadsheet row).
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRecord::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sentinels() {
        assert!(RawValue::text("  ").is_empty());
        assert!(RawValue::Text("NaT".to_string()).is_empty());
        assert!(RawValue::Text("None".to_string()).is_empty());
        assert!(RawValue::Number(f64::NAN).is_empty());
        assert!(!RawValue::Number(0.0).is_empty());
        assert!(!RawValue::text("Postes").is_empty());
    }

    #[test]
    fn test_as_text_formats_integers_plainly() {
        assert_eq!(RawValue::Number(123.0).as_text(), "123");
        assert_eq!(RawValue::Number(1.25).as_text(), "1.25");
        assert_eq!(RawValue::text("  UFV-01  ").as_text(), "UFV-01");
        assert_eq!(RawValue::Text("nan".to_string()).as_text(), "");
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let record = RawRecord::from_pairs([("b", "2"), ("a", "1"), ("c", "3")]);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = RawRecord::from_pairs([("a", "1"), ("b", "2")]);
        record.insert("a", 9.0);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&RawValue::Number(9.0)));
        assert_eq!(record.keys().next(), Some("a"));
    }

    #[test]
    fn test_blank_row_detection() {
        let record = RawRecord::from_pairs([("a", ""), ("b", "NaT")]);
        assert!(record.is_blank());
    }
}
