//! Projection of untrusted backend JSON onto canonical view types.
//!
//! A field is "present" when it is truthy in the JSON sense: `null`, `false`, `0` and `""`
//! count as missing, the same as an absent key. Every projection here is total.

pub mod analysis;
pub mod catalog;

pub use analysis::{normalize, normalize_analysis_body};
pub use catalog::{normalize_clients, normalize_products};

use serde_json::{Map, Value};

pub(crate) type Object = Map<String, Value>;

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn object(value: Option<&Value>) -> Option<&Object> {
    value.and_then(Value::as_object)
}

/// Strings as-is; numbers and booleans rendered. Containers are not text.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

pub(crate) fn whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) {
        return Some(f as u32);
    }
    None
}

pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
        _ => Vec::new(),
    }
}

/// Walks `sources` in order and, within each, `keys` in order; the first present value
/// that `extract` accepts wins. A value of the wrong type falls through like a missing one.
pub(crate) fn resolve<T>(
    sources: &[Option<&Object>],
    keys: &[&str],
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    sources
        .iter()
        .flatten()
        .copied()
        .flat_map(|source| keys.iter().filter_map(move |key| source.get(*key)))
        .filter(|value| truthy(value))
        .find_map(extract)
}

/// Rendering of a value that overwrote a canonical string slot during a merge.
pub(crate) fn merged_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
