use serde::{Deserialize, Serialize};

/// Row of `GET /clients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub annual_income: Option<f64>,
    pub risk_profile: Option<String>,
    pub investment_goals: Vec<String>,
    pub time_horizon: Option<String>,
    pub current_savings: Option<f64>,
    pub monthly_surplus: Option<f64>,
    pub dependents: Option<u32>,
    pub employment_status: Option<String>,
    pub investment_experience: Option<String>,
}

/// Row of `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub risk_level: String,
    pub description: Option<String>,
}
