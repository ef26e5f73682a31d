use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_CLIENT: &str = "Unknown Client";
pub const DEFAULT_RISK_PROFILE: &str = "Not specified";
pub const DEFAULT_INVESTMENT_HORIZON: &str = "N/A";
pub const DEFAULT_SUMMARY: &str = "No analysis summary available";
pub const DEFAULT_PROFILE_OVERVIEW: &str = "No profile overview available";
pub const DEFAULT_RISK_ASSESSMENT: &str = "No risk assessment available";
pub const MISSING_INSIGHT: &str = "No insight available";
pub const UNNAMED_PRODUCT: &str = "Unnamed Product";
pub const DEFAULT_PRODUCT_TYPE: &str = "General Investment";
pub const DEFAULT_RISK_LEVEL: &str = "Not rated";

/// A JSON object as returned by `GET /client_analysis/{id}`, not yet trusted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPayload(Map<String, Value>);

impl RawPayload {
    /// Returns `None` unless the value is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for RawPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: Option<String>,
    pub name: String,
    pub age: Option<u32>,
    pub annual_income: Option<f64>,
    pub risk_profile: String,
    pub investment_horizon: String,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            id: None,
            name: UNKNOWN_CLIENT.to_string(),
            age: None,
            annual_income: None,
            risk_profile: DEFAULT_RISK_PROFILE.to_string(),
            investment_horizon: DEFAULT_INVESTMENT_HORIZON.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub profile_overview: String,
    pub key_insights: Vec<String>,
    pub risk_assessment: String,
}

impl Default for ClientSummary {
    fn default() -> Self {
        Self {
            profile_overview: DEFAULT_PROFILE_OVERVIEW.to_string(),
            key_insights: Vec::new(),
            risk_assessment: DEFAULT_RISK_ASSESSMENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub risk_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Fields the backend sent that have no canonical slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical, render-safe view of one client analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisView {
    pub client: ClientProfile,
    pub summary: String,
    pub client_summary: ClientSummary,
    pub recommendations: Vec<ProductRecommendation>,
}

impl Default for AnalysisView {
    fn default() -> Self {
        Self {
            client: ClientProfile::default(),
            summary: DEFAULT_SUMMARY.to_string(),
            client_summary: ClientSummary::default(),
            recommendations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_payload_only_wraps_objects() {
        assert_eq!(RawPayload::from_value(json!([1, 2])), None);

        let Value::Object(map) = json!({"status": "success", "client": {"name": "Ann"}}) else {
            unreachable!()
        };
        let payload = RawPayload::from(map.clone());
        assert_eq!(payload.as_map(), &map);
        assert_eq!(RawPayload::from_value(Value::Object(map)), Some(payload));
    }
}
