use crate::domain::analysis::{DEFAULT_RISK_LEVEL, UNKNOWN_CLIENT, UNNAMED_PRODUCT};
use crate::domain::catalog::{ClientRecord, Product};
use crate::normalize::{number, resolve, string_list, text, whole_number, Object};
use serde_json::Value;

/// `/clients` has been served both as `{id: record}` and as a bare list.
pub fn normalize_clients(body: &Value) -> Option<Vec<ClientRecord>> {
    let records = match body {
        Value::Object(by_id) => by_id
            .iter()
            .filter_map(|(key, record)| {
                record.as_object().map(|r| client(Some(key.as_str()), r))
            })
            .collect(),
        Value::Array(list) => list
            .iter()
            .filter_map(Value::as_object)
            .map(|r| client(None, r))
            .collect(),
        _ => return None,
    };
    Some(records)
}

fn client(key: Option<&str>, record: &Object) -> ClientRecord {
    let src = [Some(record)];
    let field = |name: &str| resolve(&src, &[name], text);

    ClientRecord {
        id: resolve(&src, &["id", "client_id"], text)
            .or_else(|| key.map(str::to_string))
            .unwrap_or_default(),
        name: field("name").unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
        age: resolve(&src, &["age"], whole_number),
        annual_income: resolve(&src, &["annual_income"], number),
        risk_profile: field("risk_profile"),
        investment_goals: string_list(record.get("investment_goals")),
        time_horizon: field("time_horizon"),
        current_savings: resolve(&src, &["current_savings"], number),
        monthly_surplus: resolve(&src, &["monthly_surplus"], number),
        dependents: record.get("dependents").and_then(whole_number),
        employment_status: field("employment_status"),
        investment_experience: field("investment_experience"),
    }
}

/// `products` may be a list or an id-keyed mapping; anything else is unusable.
pub fn normalize_products(products: Option<&Value>) -> Option<Vec<Product>> {
    let products = match products {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_object().map(|p| product(i.to_string(), p)))
            .collect(),
        Some(Value::Object(by_id)) => by_id
            .iter()
            .filter_map(|(key, p)| p.as_object().map(|p| product(key.clone(), p)))
            .collect(),
        Some(_) => return None,
    };
    Some(products)
}

fn product(fallback_id: String, record: &Object) -> Product {
    let src = [Some(record)];
    Product {
        id: resolve(&src, &["id", "product_id"], text).unwrap_or(fallback_id),
        name: resolve(&src, &["name", "product_name"], text)
            .unwrap_or_else(|| UNNAMED_PRODUCT.to_string()),
        risk_level: resolve(&src, &["risk_level"], text)
            .unwrap_or_else(|| DEFAULT_RISK_LEVEL.to_string()),
        description: resolve(&src, &["description"], text),
    }
}
