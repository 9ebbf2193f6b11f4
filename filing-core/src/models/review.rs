use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{FilingDraft, Regime, RegimeResult};

/// Read-only summary shown on the Review & Submit step.
///
/// Figures for the chosen regime are `None` until a computation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub full_name: String,
    pub pan: String,
    pub employer_name: String,
    pub salary: Decimal,
    pub other_income: Decimal,
    pub regime: Regime,
    pub gross_total_income: Option<Decimal>,
    pub taxable_income: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub tds_paid: Option<Decimal>,
    pub refund_or_due: Option<Decimal>,
    pub is_refund: Option<bool>,
}

impl ReviewSummary {
    pub fn from_draft(draft: &FilingDraft) -> Self {
        let personal = draft.personal_info.clone().unwrap_or_default();
        let income = draft.income_data.clone().unwrap_or_default();
        let chosen = draft.chosen_result();

        Self {
            full_name: personal.full_name,
            pan: personal.pan,
            employer_name: personal.employer_name,
            salary: income.salary,
            other_income: income.other_income_total(),
            regime: draft.regime,
            gross_total_income: chosen.map(|r| r.gross_total_income),
            taxable_income: chosen.map(|r| r.taxable_income),
            total_tax: chosen.map(|r| r.total_tax),
            tds_paid: chosen.map(|r| r.tds_paid),
            refund_or_due: chosen.map(|r| r.refund_or_due),
            is_refund: chosen.map(RegimeResult::is_refund),
        }
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "—" } else { s }
}

fn opt_amount(d: &Option<Decimal>) -> String {
    d.map(|v| v.round_dp(0).to_string())
        .unwrap_or_else(|| "—".to_string())
}

impl fmt::Display for ReviewSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Name:            {}", or_dash(&self.full_name))?;
        writeln!(f, "PAN:             {}", or_dash(&self.pan))?;
        writeln!(f, "Employer:        {}", or_dash(&self.employer_name))?;
        writeln!(f, "Salary:          {}", self.salary.round_dp(0))?;
        writeln!(f, "Other income:    {}", self.other_income.round_dp(0))?;
        writeln!(f, "Gross income:    {}", opt_amount(&self.gross_total_income))?;
        writeln!(f, "Regime:          {}", self.regime.label())?;
        writeln!(f, "Taxable income:  {}", opt_amount(&self.taxable_income))?;
        writeln!(f, "Total tax:       {}", opt_amount(&self.total_tax))?;
        writeln!(f, "TDS paid:        {}", opt_amount(&self.tds_paid))?;
        match (self.refund_or_due, self.is_refund) {
            (Some(v), Some(true)) => writeln!(f, "Refund:          {}", v.round_dp(0)),
            (Some(v), _) => writeln!(f, "Tax due:         {}", v.abs().round_dp(0)),
            (None, _) => writeln!(f, "Refund/due:      —"),
        }
    }
}
