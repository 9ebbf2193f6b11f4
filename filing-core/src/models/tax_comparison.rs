use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Regime;

/// One regime's computation, produced by the remote tax engine.
///
/// `total_tax == tax_on_income + surcharge + cess` is guaranteed by the
/// producer and is not re-derived here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub gross_total_income: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub tax_on_income: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    pub tds_paid: Decimal,
    /// Positive is a refund, negative is tax still due.
    pub refund_or_due: Decimal,
}

impl RegimeResult {
    pub fn is_refund(&self) -> bool {
        self.refund_or_due >= Decimal::ZERO
    }
}

/// Old vs new regime comparison returned by the compute operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    pub old_regime: RegimeResult,
    pub new_regime: RegimeResult,
    pub recommended: Regime,
    pub savings: Decimal,
}

impl TaxComparison {
    pub fn result_for(
        &self,
        regime: Regime,
    ) -> &RegimeResult {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }
}
