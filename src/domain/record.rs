//! Per-symbol time-series records and fetch outcomes.
//!
//! Records are schema-on-read: the column set of a block is whatever the
//! first record returned for that symbol carries, in first-seen order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// A single scalar written into one grid cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<Value> for CellValue {
    /// Scalars map directly; nested arrays/objects are written as their
    /// JSON text rather than rejected.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// One row of remote data for one symbol: ordered column name → value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolRecord {
    fields: Vec<(String, CellValue)>,
}

impl SymbolRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used heavily by tests; a repeated key overwrites in place.
    pub fn with(mut self, key: &str, value: impl Into<CellValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: CellValue) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(k, v)| (k, CellValue::from(v)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for SymbolRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Which of the three outcomes a fetch produced, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Empty,
    Data,
    Failure,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutcomeKind::Empty => "empty",
            OutcomeKind::Data => "data",
            OutcomeKind::Failure => "failure",
        })
    }
}

/// Classification of a single symbol's fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Empty,
    Data(Vec<SymbolRecord>),
    Failure(String),
}

impl FetchOutcome {
    pub fn from_records(records: Vec<SymbolRecord>) -> Self {
        if records.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(records)
        }
    }

    pub fn records(&self) -> Option<&[SymbolRecord]> {
        match self {
            FetchOutcome::Data(records) => Some(records),
            _ => None,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            FetchOutcome::Empty => OutcomeKind::Empty,
            FetchOutcome::Data(_) => OutcomeKind::Data,
            FetchOutcome::Failure(_) => OutcomeKind::Failure,
        }
    }
}
