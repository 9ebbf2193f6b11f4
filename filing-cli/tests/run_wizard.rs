//! Full CLI run against a mocked filing API.

use filing_cli::config::CliConfig;
use filing_cli::inputs::WizardInputs;
use filing_cli::run::{build_registry, run_wizard};
use filing_core::chart::ProportionalLayout;
use filing_core::{FilingStatus, Regime};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INPUTS: &str = r#"
[personal]
full_name = "Asha Rao"
pan = "abcde1234f"

[income]
salary = "12,00,000"

[deductions]
section_80c = 150000
tds_paid = 80000
"#;

fn regime(total_tax: f64) -> serde_json::Value {
    json!({
        "gross_total_income": 1200000.0,
        "total_deductions": 225000.0,
        "taxable_income": 975000.0,
        "tax_on_income": total_tax,
        "surcharge": 0.0,
        "cess": 0.0,
        "total_tax": total_tax,
        "tds_paid": 80000.0,
        "refund_or_due": 80000.0 - total_tax
    })
}

async fn mock_api(suggestions_status: u16) -> MockServer {
    let server = MockServer::start().await;
    let filing = json!({
        "id": "f-7",
        "financial_year": "2025-2026",
        "assessment_year": "2026-2027",
        "itr_type": "ITR-1",
        "regime": "new",
        "status": "draft"
    });
    Mock::given(method("POST"))
        .and(path("/api/filings/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(filing.clone()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/filings/f-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(filing))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/filings/f-7/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "old_regime": regime(62400.0),
            "new_regime": regime(71500.0),
            "recommended": "old",
            "savings": 9100.0
        })))
        .mount(&server)
        .await;
    let suggestions = if suggestions_status == 200 {
        ResponseTemplate::new(200).set_body_json(json!([
            {"category": "insurance", "title": "Health insurance", "description": "80D",
             "potential_saving": 7800.0, "priority": "medium"}
        ]))
    } else {
        ResponseTemplate::new(suggestions_status).set_body_json(json!({"detail": "engine busy"}))
    };
    Mock::given(method("GET"))
        .and(path("/api/filings/f-7/suggestions"))
        .respond_with(suggestions)
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> CliConfig {
    let mut config = CliConfig::default();
    config.service.endpoint = server.uri();
    config
}

#[tokio::test]
async fn submits_and_reports_recommended_regime() {
    let server = mock_api(200).await;
    let config = config_for(&server);
    let service = build_registry().create(&config.service).await.unwrap();
    let inputs = WizardInputs::parse(INPUTS).unwrap();

    let report = run_wizard(service, &config, &inputs, true).await.unwrap();

    assert_eq!(report.status, FilingStatus::Submitted);
    assert_eq!(report.review.pan, "ABCDE1234F");
    assert_eq!(report.review.regime, Regime::Old);
    assert_eq!(report.suggestions.len(), 1);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let ProportionalLayout::Donut(donut) = &report.deduction_chart else {
        panic!("expected deduction chart");
    };
    let labels: Vec<_> = donut.segments.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["80C", "Std Ded"]);
    let bars = report.regime_chart.as_ref().unwrap();
    assert_eq!(bars.layout.bar_a.value, 62400.0);

    let puts = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    // three steps, the regime, the submission
    assert_eq!(puts, 5);
}

#[tokio::test]
async fn suggestion_failure_becomes_a_warning() {
    let server = mock_api(503).await;
    let config = config_for(&server);
    let service = build_registry().create(&config.service).await.unwrap();
    let inputs = WizardInputs::parse(INPUTS).unwrap();

    let report = run_wizard(service, &config, &inputs, false).await.unwrap();

    assert_eq!(report.status, FilingStatus::InProgress);
    assert!(report.suggestions.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("engine busy"));

    let rendered = report.to_string();
    assert!(rendered.contains("Filing f-7 (in_progress)"));
    assert!(rendered.contains("warning: could not load suggestions"));
}
