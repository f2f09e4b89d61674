use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::sources::SourceError;

/// Source 回傳的原始資料，欄位形狀由外部來源決定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEntry {
    pub data: Map<String, Value>,
}

impl RawEntry {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Top-level field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Field nested under the `bib` object.
    pub fn bib_field(&self, key: &str) -> Option<&Value> {
        self.data.get("bib")?.as_object()?.get(key)
    }

    pub fn bib_mut(&mut self) -> &mut Map<String, Value> {
        let bib = self
            .data
            .entry("bib")
            .or_insert_with(|| Value::Object(Map::new()));
        if !bib.is_object() {
            *bib = Value::Object(Map::new());
        }
        match bib {
            Value::Object(map) => map,
            _ => unreachable!("bib was just replaced with an object"),
        }
    }
}

impl From<Map<String, Value>> for RawEntry {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for Authors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authors::Text(text) => f.write_str(text),
            Authors::List(names) => f.write_str(&names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(year) => write!(f, "{}", year),
            Year::Text(text) => f.write_str(text),
        }
    }
}

/// 輸出檔案中的一筆 publication，欄位順序即 JSON key 順序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: Option<String>,
    pub authors: Option<Authors>,
    pub venue: Option<String>,
    pub year: Option<Year>,
    pub url: Option<String>,
}

/// Outcome of a fetch. A failed fetch never carries entries.
#[derive(Debug)]
pub enum FetchOutcome {
    Succeeded(Vec<RawEntry>),
    Failed(SourceError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded(_))
    }

    pub fn entries(&self) -> &[RawEntry] {
        match self {
            FetchOutcome::Succeeded(entries) => entries,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn into_entries(self) -> Vec<RawEntry> {
        match self {
            FetchOutcome::Succeeded(entries) => entries,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub publications: Vec<Publication>,
    /// Number of output fields that were null-filled.
    pub missing_fields: usize,
}
