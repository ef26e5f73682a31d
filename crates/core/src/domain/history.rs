use crate::domain::analysis::{AnalysisView, DEFAULT_PROFILE_OVERVIEW, DEFAULT_SUMMARY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const NO_SUMMARY: &str = "No summary available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Success,
    Error,
    /// Anything else the backend wrote, kept verbatim (empty when absent).
    Unknown(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Success => "success",
            RecordStatus::Error => "error",
            RecordStatus::Unknown(s) if s.is_empty() => "unknown",
            RecordStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" => RecordStatus::Success,
            "error" => RecordStatus::Error,
            _ => RecordStatus::Unknown(value),
        }
    }
}

impl From<RecordStatus> for String {
    fn from(value: RecordStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One past analysis. Identity is `(client_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Option<String>,
    pub client_id: String,
    pub client_name: Option<String>,
    pub timestamp: String,
    pub status: RecordStatus,
    pub analysis: Option<AnalysisView>,
}

impl AnalysisRecord {
    pub fn key(&self) -> (&str, &str) {
        (&self.client_id, &self.timestamp)
    }

    /// Summary line for list rendering: the analysis summary, then the profile overview.
    pub fn preview_summary(&self) -> &str {
        let Some(view) = &self.analysis else {
            return NO_SUMMARY;
        };
        fn given(text: &str, default: &str) -> bool {
            !text.is_empty() && text != default
        }
        if given(&view.summary, DEFAULT_SUMMARY) {
            &view.summary
        } else if given(&view.client_summary.profile_overview, DEFAULT_PROFILE_OVERVIEW) {
            &view.client_summary.profile_overview
        } else {
            NO_SUMMARY
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_analyses: usize,
    pub unique_client_ids: BTreeSet<String>,
}

impl HistoryStats {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        Self {
            total_analyses: records.len(),
            unique_client_ids: records.iter().map(|r| r.client_id.clone()).collect(),
        }
    }

    pub fn unique_clients(&self) -> usize {
        self.unique_client_ids.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryView {
    pub records: Vec<AnalysisRecord>,
    pub stats: HistoryStats,
}

impl HistoryView {
    pub fn contains(&self, client_id: &str, timestamp: &str) -> bool {
        self.records.iter().any(|r| r.key() == (client_id, timestamp))
    }
}
