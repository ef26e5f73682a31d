//! Plain-text rendering of the view models.

use advisor_core::domain::analysis::{AnalysisView, ProductRecommendation};
use advisor_core::domain::catalog::{ClientRecord, Product};
use advisor_core::domain::history::{AnalysisRecord, HistoryView};
use std::io::{self, Write};

const NOT_AVAILABLE: &str = "N/A";
const PREVIEW_RECOMMENDATIONS: usize = 2;

pub fn analysis(out: &mut dyn Write, view: &AnalysisView) -> io::Result<()> {
    let client = &view.client;
    writeln!(out, "Client Overview")?;
    writeln!(out, "  Name:           {}", client.name)?;
    writeln!(out, "  Age:            {}", or_na(client.age))?;
    writeln!(out, "  Annual Income:  {}", or_na(client.annual_income.map(money)))?;
    writeln!(out, "  Risk Profile:   {}", client.risk_profile)?;
    writeln!(out, "  Horizon:        {}", client.investment_horizon)?;

    writeln!(out)?;
    writeln!(out, "Summary")?;
    writeln!(out, "  {}", view.summary)?;

    let summary = &view.client_summary;
    writeln!(out)?;
    writeln!(out, "Profile Overview")?;
    writeln!(out, "  {}", summary.profile_overview)?;
    if !summary.key_insights.is_empty() {
        writeln!(out)?;
        writeln!(out, "Key Insights")?;
        for insight in &summary.key_insights {
            writeln!(out, "  - {insight}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Risk Assessment")?;
    writeln!(out, "  {}", summary.risk_assessment)?;

    writeln!(out)?;
    writeln!(out, "Product Recommendations")?;
    if view.recommendations.is_empty() {
        writeln!(out, "  No recommendations available.")?;
    }
    for (n, rec) in view.recommendations.iter().enumerate() {
        recommendation(out, n + 1, rec)?;
    }
    Ok(())
}

fn recommendation(out: &mut dyn Write, n: usize, rec: &ProductRecommendation) -> io::Result<()> {
    write!(out, "  {n}. {} [{}] [Risk: {}]", rec.name, rec.kind, rec.risk_level)?;
    if let Some(priority) = &rec.priority {
        write!(out, " [{priority}]")?;
    }
    writeln!(out)?;
    if let Some(reason) = &rec.reason {
        writeln!(out, "     {reason}")?;
    }
    if let Some(expected) = rec.expected_return {
        writeln!(out, "     Expected Return: {expected}%")?;
    }
    Ok(())
}

pub fn history(out: &mut dyn Write, view: &HistoryView) -> io::Result<()> {
    writeln!(out, "Statistics")?;
    writeln!(out, "  Total Analyses: {}", view.stats.total_analyses)?;
    writeln!(out, "  Unique Clients: {}", view.stats.unique_clients())?;
    writeln!(out)?;

    if view.records.is_empty() {
        writeln!(out, "No analysis history found.")?;
        writeln!(out, "Run some client analyses to see them here.")?;
        return Ok(());
    }

    writeln!(out, "All Analyses")?;
    for record in &view.records {
        writeln!(out)?;
        history_record(out, record)?;
    }
    Ok(())
}

fn history_record(out: &mut dyn Write, record: &AnalysisRecord) -> io::Result<()> {
    writeln!(
        out,
        "Client: {}  ({})  [{}]",
        record.client_id, record.timestamp, record.status
    )?;
    let name = record
        .analysis
        .as_ref()
        .map(|a| a.client.name.as_str())
        .or(record.client_name.as_deref())
        .unwrap_or(NOT_AVAILABLE);
    writeln!(out, "  Client Name: {name}")?;
    writeln!(out, "  Summary: {}", record.preview_summary())?;

    // Counts the normalized list, so unidentifiable raw entries are not "more".
    let recommendations = record
        .analysis
        .as_ref()
        .map(|a| a.recommendations.as_slice())
        .unwrap_or_default();
    if recommendations.is_empty() {
        return Ok(());
    }
    writeln!(out, "  Recommendations:")?;
    for rec in recommendations.iter().take(PREVIEW_RECOMMENDATIONS) {
        match rec.confidence.filter(|c| *c != 0.0) {
            Some(c) => writeln!(out, "    - {} ({:.1}% confidence)", rec.name, c * 100.0)?,
            None => writeln!(out, "    - {}", rec.name)?,
        }
    }
    if recommendations.len() > PREVIEW_RECOMMENDATIONS {
        let more = recommendations.len() - PREVIEW_RECOMMENDATIONS;
        writeln!(out, "    ... and {more} more")?;
    }
    Ok(())
}

pub fn clients(out: &mut dyn Write, clients: &[ClientRecord]) -> io::Result<()> {
    if clients.is_empty() {
        return writeln!(out, "No clients found.");
    }
    for client in clients {
        writeln!(
            out,
            "{}  {}  age {}  income {}  risk {}  horizon {}",
            client.id,
            client.name,
            or_na(client.age),
            or_na(client.annual_income.map(money)),
            client.risk_profile.as_deref().unwrap_or(NOT_AVAILABLE),
            client.time_horizon.as_deref().unwrap_or(NOT_AVAILABLE),
        )?;
        writeln!(
            out,
            "    savings {}  monthly surplus {}  dependents {}",
            or_na(client.current_savings.map(money)),
            or_na(client.monthly_surplus.map(money)),
            or_na(client.dependents),
        )?;
        writeln!(
            out,
            "    employment {}  experience {}",
            client.employment_status.as_deref().unwrap_or(NOT_AVAILABLE),
            client.investment_experience.as_deref().unwrap_or(NOT_AVAILABLE),
        )?;
        if !client.investment_goals.is_empty() {
            writeln!(out, "    goals: {}", client.investment_goals.join(", "))?;
        }
    }
    Ok(())
}

pub fn products(out: &mut dyn Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }
    for product in products {
        writeln!(out, "{}  {}  [Risk: {}]", product.id, product.name, product.risk_level)?;
        if let Some(description) = &product.description {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(())
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// `85000.5` renders as `$85,000.50`; whole amounts drop the cents.
fn money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::domain::history::{HistoryStats, RecordStatus};
    use advisor_core::history::{aggregate, HistoryIndex};
    use serde_json::{json, Map};

    fn rendered(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn rec(name: &str, confidence: Option<f64>) -> ProductRecommendation {
        ProductRecommendation {
            id: name.to_lowercase(),
            name: name.to_string(),
            kind: "ETF".to_string(),
            risk_level: "low".to_string(),
            reason: Some("Diversified".to_string()),
            priority: None,
            expected_return: Some(6.5),
            confidence,
            extra: Map::new(),
        }
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(85000.0), "$85,000");
        assert_eq!(money(1234567.5), "$1,234,567.50");
        assert_eq!(money(999.0), "$999");
        assert_eq!(money(-1500.0), "-$1,500");
    }

    #[test]
    fn default_view_renders_placeholders() {
        let text = rendered(|out| analysis(out, &AnalysisView::default()));
        assert!(text.contains("Name:           Unknown Client"));
        assert!(text.contains("Age:            N/A"));
        assert!(text.contains("No recommendations available."));
        assert!(!text.contains("Key Insights"));
    }

    #[test]
    fn recommendations_show_badges_and_return() {
        let view = AnalysisView {
            recommendations: vec![rec("Index Fund", None)],
            ..AnalysisView::default()
        };
        let text = rendered(|out| analysis(out, &view));
        assert!(text.contains("1. Index Fund [ETF] [Risk: low]"));
        assert!(text.contains("Diversified"));
        assert!(text.contains("Expected Return: 6.5%"));
    }

    #[test]
    fn history_preview_truncates_recommendations() {
        let view = AnalysisView {
            summary: "Balanced growth".to_string(),
            recommendations: vec![
                rec("Bonds", Some(0.82)),
                rec("Equity", Some(0.0)),
                rec("Gold", Some(0.5)),
            ],
            ..AnalysisView::default()
        };
        let record = AnalysisRecord {
            id: None,
            client_id: "C1".to_string(),
            client_name: None,
            timestamp: "2024-06-01T00:00:00Z".to_string(),
            status: RecordStatus::Success,
            analysis: Some(view),
        };
        let history_view = HistoryView {
            stats: HistoryStats::from_records(std::slice::from_ref(&record)),
            records: vec![record],
        };

        let text = rendered(|out| history(out, &history_view));
        assert!(text.contains("Total Analyses: 1"));
        assert!(text.contains("Client: C1  (2024-06-01T00:00:00Z)  [success]"));
        assert!(text.contains("Summary: Balanced growth"));
        assert!(text.contains("- Bonds (82.0% confidence)"));
        assert!(text.contains("- Equity\n"));
        assert!(!text.contains("Gold"));
        assert!(text.contains("... and 1 more"));
    }

    #[test]
    fn empty_history_explains_itself() {
        let text = rendered(|out| history(out, &HistoryView::default()));
        assert!(text.contains("Unique Clients: 0"));
        assert!(text.contains("No analysis history found."));
    }

    #[test]
    fn clients_show_every_column() {
        let clients = vec![ClientRecord {
            id: "C001".to_string(),
            name: "Jane Doe".to_string(),
            age: Some(34),
            annual_income: Some(85000.0),
            risk_profile: Some("moderate".to_string()),
            investment_goals: vec!["Retirement".to_string(), "House".to_string()],
            time_horizon: Some("10 years".to_string()),
            current_savings: Some(25000.5),
            monthly_surplus: Some(1200.0),
            dependents: Some(0),
            employment_status: Some("Employed".to_string()),
            investment_experience: Some("Intermediate".to_string()),
        }];
        let text = rendered(|out| super::clients(out, &clients));
        for expected in [
            "C001",
            "Jane Doe",
            "age 34",
            "income $85,000",
            "risk moderate",
            "horizon 10 years",
            "savings $25,000.50",
            "monthly surplus $1,200",
            "dependents 0",
            "employment Employed",
            "experience Intermediate",
            "goals: Retirement, House",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in:\n{text}");
        }
    }

    #[test]
    fn sparse_client_falls_back_to_na() {
        let clients = vec![ClientRecord {
            id: "C002".to_string(),
            name: "Bob".to_string(),
            age: None,
            annual_income: None,
            risk_profile: None,
            investment_goals: Vec::new(),
            time_horizon: None,
            current_savings: None,
            monthly_surplus: None,
            dependents: None,
            employment_status: None,
            investment_experience: None,
        }];
        let text = rendered(|out| super::clients(out, &clients));
        assert!(text.contains("savings N/A  monthly surplus N/A  dependents N/A"));
        assert!(text.contains("employment N/A  experience N/A"));
        assert!(!text.contains("goals:"));
    }

    #[test]
    fn history_preview_counts_only_kept_recommendations() {
        let index = HistoryIndex::from_analyses(Some(json!({
            "C1": {
                "timestamp": "2024-06-01T00:00:00Z",
                "analysis_result": {
                    "recommendations": [
                        {"name": "Bonds"},
                        {"reason": "no identifying field"},
                        {"name": "Equity"},
                        {"product_name": "Gold"}
                    ]
                }
            }
        })))
        .unwrap();
        let (records, stats) = aggregate(&index);
        let view = HistoryView { records, stats };

        let text = rendered(|out| history(out, &view));
        assert!(text.contains("- Bonds\n"));
        assert!(text.contains("- Equity\n"));
        assert!(text.contains("... and 1 more"));
    }

    #[test]
    fn products_list_descriptions() {
        let products = vec![Product {
            id: "P1".to_string(),
            name: "Bonds".to_string(),
            risk_level: "low".to_string(),
            description: Some("Government bonds".to_string()),
        }];
        let text = rendered(|out| super::products(out, &products));
        assert_eq!(text, "P1  Bonds  [Risk: low]\n    Government bonds\n");
    }
}
