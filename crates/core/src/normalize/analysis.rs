use crate::domain::analysis::{
    AnalysisView, ClientProfile, ClientSummary, ProductRecommendation, RawPayload,
    DEFAULT_INVESTMENT_HORIZON, DEFAULT_PRODUCT_TYPE, DEFAULT_PROFILE_OVERVIEW,
    DEFAULT_RISK_ASSESSMENT, DEFAULT_RISK_LEVEL, DEFAULT_RISK_PROFILE, DEFAULT_SUMMARY,
    MISSING_INSIGHT, UNKNOWN_CLIENT, UNNAMED_PRODUCT,
};
use crate::normalize::{merged_text, number, object, resolve, text, truthy, whole_number, Object};
use serde_json::Value;

/// A raw recommendation must carry at least one of these to be kept.
const IDENTIFYING_FIELDS: [&str; 4] = ["id", "name", "product_id", "product_name"];

/// Projects a fetched `/client_analysis/{id}` body onto [`AnalysisView`].
pub fn normalize(raw: &RawPayload) -> AnalysisView {
    let root = raw.as_map();
    build_view(object(root.get("client")), object(root.get("ai_analysis")))
}

/// Normalizes a stored analysis payload. Accepts either the bare `ai_analysis` body or a
/// whole response (`{client, ai_analysis, ...}`), since both have been persisted over time.
pub fn normalize_analysis_body(body: &Object) -> AnalysisView {
    match object(body.get("ai_analysis")) {
        Some(analysis) => build_view(object(body.get("client")), Some(analysis)),
        None => build_view(None, Some(body)),
    }
}

fn build_view(client: Option<&Object>, analysis: Option<&Object>) -> AnalysisView {
    let summary_obj = analysis.and_then(|a| object(a.get("client_summary")));

    AnalysisView {
        client: profile(client, summary_obj),
        summary: resolve(&[analysis], &["summary"], text)
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        client_summary: client_summary(summary_obj),
        recommendations: recommendations(analysis.and_then(|a| a.get("recommendations"))),
    }
}

/// `client` first, then the same key inside `client_summary`, then the literal default.
fn profile(client: Option<&Object>, summary: Option<&Object>) -> ClientProfile {
    let sources = [client, summary];
    ClientProfile {
        id: resolve(&[client], &["id", "client_id"], text),
        name: resolve(&sources, &["name"], text).unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
        age: resolve(&sources, &["age"], whole_number),
        annual_income: resolve(&sources, &["annual_income"], number),
        risk_profile: resolve(&sources, &["risk_profile"], text)
            .unwrap_or_else(|| DEFAULT_RISK_PROFILE.to_string()),
        investment_horizon: resolve(&sources, &["investment_horizon", "time_horizon"], text)
            .unwrap_or_else(|| DEFAULT_INVESTMENT_HORIZON.to_string()),
    }
}

fn client_summary(summary: Option<&Object>) -> ClientSummary {
    ClientSummary {
        profile_overview: resolve(&[summary], &["profile_overview"], text)
            .unwrap_or_else(|| DEFAULT_PROFILE_OVERVIEW.to_string()),
        key_insights: insights(summary.and_then(|s| s.get("key_insights"))),
        risk_assessment: resolve(&[summary], &["risk_assessment"], text)
            .unwrap_or_else(|| DEFAULT_RISK_ASSESSMENT.to_string()),
    }
}

/// Keeps the list's length; an entry with no usable text becomes a placeholder.
fn insights(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            Some(item)
                .filter(|v| truthy(v))
                .and_then(text)
                .unwrap_or_else(|| MISSING_INSIGHT.to_string())
        })
        .collect()
}

fn recommendations(raw: Option<&Value>) -> Vec<ProductRecommendation> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let Some(fields) = entry.as_object().filter(|f| is_identifiable(f)) else {
                tracing::debug!(position, "dropping recommendation without identifying fields");
                return None;
            };
            Some(recommendation(position, fields))
        })
        .collect()
}

fn is_identifiable(fields: &Object) -> bool {
    IDENTIFYING_FIELDS
        .iter()
        .any(|key| fields.get(*key).is_some_and(truthy))
}

/// Resolves the canonical slots, then lays every raw field over them. A raw
/// field that shares a canonical key wins even when it is empty or `null`.
fn recommendation(position: usize, raw: &Object) -> ProductRecommendation {
    let name = resolve(&[Some(raw)], &["name", "product_name"], text)
        .unwrap_or_else(|| UNNAMED_PRODUCT.to_string());
    let id = resolve(&[Some(raw)], &["id", "product_id"], text)
        .unwrap_or_else(|| fallback_id(position, &name));

    let mut merged = Object::new();
    merged.insert("id".into(), Value::String(id));
    merged.insert("name".into(), Value::String(name));
    merged.insert("type".into(), Value::String(DEFAULT_PRODUCT_TYPE.into()));
    merged.insert("risk_level".into(), Value::String(DEFAULT_RISK_LEVEL.into()));
    for (key, value) in raw {
        merged.insert(key.clone(), value.clone());
    }

    let mut take_text =
        |key: &str| merged.remove(key).map(|v| merged_text(&v)).unwrap_or_default();
    let id = take_text("id");
    let name = take_text("name");
    let kind = take_text("type");
    let risk_level = take_text("risk_level");

    ProductRecommendation {
        id,
        name,
        kind,
        risk_level,
        reason: take_string(&mut merged, "reason"),
        priority: take_string(&mut merged, "priority"),
        expected_return: take_number(&mut merged, "expected_return"),
        confidence: take_number(&mut merged, "confidence"),
        extra: merged,
    }
}

/// Moves `key` out of `fields` when it has the expected type; otherwise leaves it in place
/// so it still travels with the recommendation.
fn take_string(fields: &mut Object, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn take_number(fields: &mut Object, key: &str) -> Option<f64> {
    let n = fields.get(key).and_then(number)?;
    fields.remove(key);
    Some(n)
}

/// Stable id for a recommendation the backend sent without one: position plus a slug of
/// the resolved name, so re-normalizing the same payload yields the same ids.
pub(crate) fn fallback_id(position: usize, name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("rec-{position}")
    } else {
        format!("rec-{position}-{slug}")
    }
}
