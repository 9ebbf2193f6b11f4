use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat standard deduction for salaried filers, FY 2025-26.
pub const STANDARD_DEDUCTION: Decimal = Decimal::from_parts(75_000, 0, 0, false, 0);

/// Collected on the Personal Details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub pan: String,
    pub date_of_birth: String,
    pub gender: String,
    pub residential_status: String,
    pub employer_name: String,
    pub employer_tan: String,
}

/// Collected on the Income Sources step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeData {
    pub salary: Decimal,
    pub house_property: Decimal,
    pub capital_gains_short: Decimal,
    pub capital_gains_long: Decimal,
    pub business_income: Decimal,
    pub other_income: Decimal,
    pub exempt_income: Decimal,
}

impl IncomeData {
    /// Every taxable head except salary.
    pub fn other_income_total(&self) -> Decimal {
        self.house_property
            + self.capital_gains_short
            + self.capital_gains_long
            + self.business_income
            + self.other_income
    }

    /// Salary plus every other taxable head. Exempt income is excluded.
    pub fn gross_total(&self) -> Decimal {
        self.salary + self.other_income_total()
    }
}

/// Collected on the Deductions step.
///
/// Statutory caps (80C at 1,50,000, NPS at 50,000, home loan interest at
/// 2,00,000) are enforced by the computation service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionData {
    pub section_80c: Decimal,
    pub section_80ccd_1b: Decimal,
    pub section_80d: Decimal,
    pub section_80g: Decimal,
    pub hra_exemption: Decimal,
    pub home_loan_interest: Decimal,
    pub education_loan_interest: Decimal,
    pub standard_deduction: Decimal,
}

impl Default for DeductionData {
    fn default() -> Self {
        Self {
            section_80c: Decimal::ZERO,
            section_80ccd_1b: Decimal::ZERO,
            section_80d: Decimal::ZERO,
            section_80g: Decimal::ZERO,
            hra_exemption: Decimal::ZERO,
            home_loan_interest: Decimal::ZERO,
            education_loan_interest: Decimal::ZERO,
            standard_deduction: STANDARD_DEDUCTION,
        }
    }
}
