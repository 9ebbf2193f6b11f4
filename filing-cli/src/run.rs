use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use filing_core::chart::{self, ProportionalLayout, RegimeChart};
use filing_core::{
    FilingId, FilingService, FilingStatus, ReviewSummary, ServiceRegistry, SuggestionEntry,
    WizardController, WizardStep,
};
use filing_http::HttpServiceFactory;

use crate::config::CliConfig;
use crate::inputs::WizardInputs;

/// Every backend this binary can talk to.
pub fn build_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register(Box::new(HttpServiceFactory));
    registry
}

/// What a completed run produced, ready to print or serialize.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub filing_id: FilingId,
    pub status: FilingStatus,
    pub review: ReviewSummary,
    pub suggestions: Vec<SuggestionEntry>,
    pub deduction_chart: ProportionalLayout,
    pub regime_chart: Option<RegimeChart>,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<String>,
}

/// Walks a new filing through every wizard step with `inputs`.
///
/// Stops at Review & Submit unless `submit` is set.
pub async fn run_wizard(
    service: Arc<dyn FilingService>,
    config: &CliConfig,
    inputs: &WizardInputs,
    submit: bool,
) -> Result<RunReport> {
    let mut wizard = WizardController::initialize(service, &config.classification).await?;
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    loop {
        let step = wizard.step();
        info!(step = %step, "step {} of {}", step.index() + 1, WizardStep::ALL.len());
        match step {
            WizardStep::PersonalDetails | WizardStep::IncomeSources | WizardStep::Deductions => {
                for (name, value) in inputs.staged_for(step).iter() {
                    wizard.stage(name, value);
                }
            }
            WizardStep::TaxCalculation => {
                wizard
                    .compute_tax()
                    .await
                    .context("tax computation did not complete")?;
            }
            WizardStep::Optimization => match wizard.fetch_suggestions().await {
                Ok(entries) => suggestions = entries,
                Err(e) => {
                    warn!("{}", e);
                    warnings.push(e.to_string());
                }
            },
            WizardStep::ReviewSubmit => break,
        }
        wizard
            .advance()
            .await
            .with_context(|| format!("could not leave {step}"))?;
    }

    if submit {
        wizard.submit().await?;
    }
    wizard.settle_background().await;
    warnings.extend(wizard.take_soft_errors().into_iter().map(|e| e.to_string()));

    let draft = wizard.draft();
    if submit && draft.status != FilingStatus::Submitted {
        bail!("filing {} was not marked submitted", draft.id);
    }
    let deduction_chart = chart::proportional_segments(
        &chart::deduction_categories(&draft.deduction_data.clone().unwrap_or_default()),
        config.chart.width,
        config.chart.height,
    );
    let regime_chart = draft
        .tax_computation
        .as_ref()
        .map(|tc| chart::regime_bars(tc, config.chart.width, config.chart.height));

    Ok(RunReport {
        filing_id: draft.id.clone(),
        status: draft.status,
        review: wizard.review_summary(),
        suggestions,
        deduction_chart,
        regime_chart,
        warnings,
    })
}

impl std::fmt::Display for RunReport {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "Filing {} ({})", self.filing_id, self.status.as_str())?;
        write!(f, "{}", self.review)?;
        if !self.suggestions.is_empty() {
            writeln!(f, "\nSuggestions:")?;
            for s in &self.suggestions {
                write!(f, "  [{}] {}", s.priority.as_str(), s.title)?;
                if s.has_saving() {
                    write!(f, " (save up to {})", s.potential_saving.round_dp(0))?;
                }
                writeln!(f)?;
            }
        }
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn report_with(suggestions: serde_json::Value) -> RunReport {
        let draft = serde_json::from_value(json!({
            "id": "f-9",
            "financial_year": "2025-2026",
            "assessment_year": "2026-2027",
            "itr_type": "ITR-1",
            "status": "in_progress",
        }))
        .unwrap();
        RunReport {
            filing_id: FilingId::new("f-9"),
            status: FilingStatus::InProgress,
            review: ReviewSummary::from_draft(&draft),
            suggestions: serde_json::from_value(suggestions).unwrap(),
            deduction_chart: ProportionalLayout::Empty,
            regime_chart: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn saving_is_shown_only_when_positive() {
        let report = report_with(json!([
            {"category": "investment", "title": "Top up 80C", "description": "",
             "potential_saving": 15600.0, "priority": "high"},
            {"category": "general", "title": "Keep rent receipts", "description": "",
             "potential_saving": 0.0, "priority": "low"},
        ]));

        let rendered = report.to_string();

        assert!(rendered.contains("  [high] Top up 80C (save up to 15600)\n"));
        assert!(rendered.contains("  [low] Keep rent receipts\n"));
        assert!(!rendered.contains("save up to 0"));
    }
}
