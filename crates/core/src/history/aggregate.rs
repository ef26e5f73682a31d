use crate::domain::analysis::UNKNOWN_CLIENT;
use crate::domain::history::{AnalysisRecord, HistoryStats, RecordStatus};
use crate::history::{HistoryEntry, HistoryIndex};
use crate::normalize::{normalize_analysis_body, object, resolve, text, Object};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Tag for flat-list records that do not name their client.
const UNTAGGED_CLIENT: &str = "unknown";

/// Current field name first, legacy second.
const PAYLOAD_FIELDS: [&str; 2] = ["analysis_result", "analysis_data"];

/// Flattens the index into one list, newest first, and derives the statistics.
///
/// Equal timestamps keep their index order. Records whose timestamp does not parse sort
/// after every dated record.
pub fn aggregate(index: &HistoryIndex) -> (Vec<AnalysisRecord>, HistoryStats) {
    let mut keyed: Vec<(Option<DateTime<Utc>>, AnalysisRecord)> = Vec::new();
    let mut push = |client_id: &str, raw: &Value| match record(client_id, raw) {
        Some(r) => keyed.push((parse_timestamp(&r.timestamp), r)),
        None => tracing::debug!(client_id, "skipping non-object history record"),
    };

    match index {
        HistoryIndex::ByClient(entries) => {
            for (client_id, entry) in entries {
                match entry {
                    HistoryEntry::Single(raw) => push(client_id.as_str(), raw),
                    HistoryEntry::Many(raws) => {
                        raws.iter().for_each(|raw| push(client_id.as_str(), raw))
                    }
                }
            }
        }
        HistoryIndex::Flat(raws) => {
            for raw in raws {
                let client_id = raw
                    .as_object()
                    .and_then(|fields| resolve(&[Some(fields)], &["client_id"], text))
                    .unwrap_or_else(|| UNTAGGED_CLIENT.to_string());
                push(&client_id, raw);
            }
        }
    }

    // `sort_by` is stable; `None` orders below every `Some`.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    let records: Vec<_> = keyed.into_iter().map(|(_, r)| r).collect();
    let stats = HistoryStats::from_records(&records);
    (records, stats)
}

fn record(client_id: &str, raw: &Value) -> Option<AnalysisRecord> {
    let fields = raw.as_object()?;
    let src = [Some(fields)];

    let payload: Option<&Object> = PAYLOAD_FIELDS
        .iter()
        .find_map(|key| object(fields.get(*key)));
    let client_name = resolve(&src, &["client_name"], text);

    let analysis = payload.map(|body| {
        let mut view = normalize_analysis_body(body);
        if view.client.name == UNKNOWN_CLIENT {
            if let Some(name) = &client_name {
                view.client.name = name.clone();
            }
        }
        view.client.id.get_or_insert_with(|| client_id.to_string());
        view
    });

    let status = match resolve(&src, &["status"], text) {
        Some(s) => RecordStatus::from(s),
        None if payload.is_some_and(|p| p.contains_key("error")) => RecordStatus::Error,
        None if payload.is_some() => RecordStatus::Success,
        None => RecordStatus::Unknown(String::new()),
    };

    Some(AnalysisRecord {
        id: resolve(&src, &["id", "analysis_id"], text),
        client_id: client_id.to_string(),
        client_name,
        timestamp: resolve(&src, &["timestamp", "created_at"], text).unwrap_or_default(),
        status,
        analysis,
    })
}

/// RFC 3339, or offset-less ISO-8601 read as UTC. `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
