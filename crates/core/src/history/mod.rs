//! The per-client analysis history index and its flattening.

pub mod aggregate;

pub use aggregate::{aggregate, parse_timestamp};

use serde_json::Value;

/// What one client id maps to. Older backends stored a single record, newer ones a list.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Single(Value),
    Many(Vec<Value>),
}

/// Raw `analyses` value of `GET /client_analysis/history/all`.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryIndex {
    /// `{client_id: record | [record, ...]}`, in the order the backend sent it.
    ByClient(Vec<(String, HistoryEntry)>),
    /// `[record, ...]` where each record names its own `client_id`.
    Flat(Vec<Value>),
}

impl Default for HistoryIndex {
    fn default() -> Self {
        HistoryIndex::ByClient(Vec::new())
    }
}

impl HistoryIndex {
    /// Absent or `null` is an empty index. Returns `None` for scalars.
    pub fn from_analyses(analyses: Option<Value>) -> Option<Self> {
        match analyses {
            None | Some(Value::Null) => Some(Self::default()),
            Some(Value::Array(records)) => Some(HistoryIndex::Flat(records)),
            Some(Value::Object(by_client)) => Some(HistoryIndex::ByClient(
                by_client
                    .into_iter()
                    .map(|(client_id, value)| {
                        let entry = match value {
                            Value::Array(records) => HistoryEntry::Many(records),
                            single => HistoryEntry::Single(single),
                        };
                        (client_id, entry)
                    })
                    .collect(),
            )),
            Some(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HistoryIndex::ByClient(entries) => entries.is_empty(),
            HistoryIndex::Flat(records) => records.is_empty(),
        }
    }
}
