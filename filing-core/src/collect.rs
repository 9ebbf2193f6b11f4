//! Step data collectors.
//!
//! Each collector reads a fixed set of named fields from the current input
//! surface and produces the payload for one persisting wizard step. Values
//! are coerced, never validated: numbers that are missing or unparseable
//! become zero and missing strings become empty. The service is the
//! authority on whether a payload is acceptable.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{DeductionData, FilingDraft, IncomeData, PersonalInfo, STANDARD_DEDUCTION};
use crate::wizard::WizardStep;

/// Names of every field a collector reads, grouped by step.
pub mod fields {
    pub const FULL_NAME: &str = "full_name";
    pub const PAN: &str = "pan";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const GENDER: &str = "gender";
    pub const RESIDENTIAL_STATUS: &str = "residential_status";
    pub const EMPLOYER_NAME: &str = "employer_name";

    pub const SALARY: &str = "salary";
    pub const HOUSE_PROPERTY: &str = "house_property";
    pub const CAPITAL_GAINS_SHORT: &str = "capital_gains_short";
    pub const CAPITAL_GAINS_LONG: &str = "capital_gains_long";
    pub const BUSINESS_INCOME: &str = "business_income";
    pub const OTHER_INCOME: &str = "other_income";

    pub const SECTION_80C: &str = "section_80c";
    pub const SECTION_80CCD_1B: &str = "section_80ccd_1b";
    pub const SECTION_80D: &str = "section_80d";
    pub const SECTION_80G: &str = "section_80g";
    pub const HRA_EXEMPTION: &str = "hra_exemption";
    pub const HOME_LOAN_INTEREST: &str = "home_loan_interest";
    pub const EDUCATION_LOAN_INTEREST: &str = "education_loan_interest";
    pub const TDS_PAID: &str = "tds_paid";

    pub const PERSONAL: &[&str] = &[
        FULL_NAME,
        PAN,
        DATE_OF_BIRTH,
        GENDER,
        RESIDENTIAL_STATUS,
        EMPLOYER_NAME,
    ];

    pub const INCOME: &[&str] = &[
        SALARY,
        HOUSE_PROPERTY,
        CAPITAL_GAINS_SHORT,
        CAPITAL_GAINS_LONG,
        BUSINESS_INCOME,
        OTHER_INCOME,
    ];

    pub const DEDUCTIONS: &[&str] = &[
        SECTION_80C,
        SECTION_80CCD_1B,
        SECTION_80D,
        SECTION_80G,
        HRA_EXEMPTION,
        HOME_LOAN_INTEREST,
        EDUCATION_LOAN_INTEREST,
        TDS_PAID,
    ];
}

/// Read access to whatever currently holds the user's staged values.
pub trait FieldSource {
    fn field(
        &self,
        name: &str,
    ) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Values typed into the current step but not yet confirmed by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedInput {
    values: HashMap<String, String>,
}

impl StagedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-stage the confirmed values of `step` from `draft`.
    ///
    /// Steps without confirmed data, and steps that take no input, leave the
    /// staged values as they are.
    pub fn prefill_from(
        &mut self,
        step: WizardStep,
        draft: &FilingDraft,
    ) {
        match step {
            WizardStep::PersonalDetails => {
                if let Some(pi) = &draft.personal_info {
                    self.set(fields::FULL_NAME, pi.full_name.as_str());
                    self.set(fields::PAN, pi.pan.as_str());
                    self.set(fields::DATE_OF_BIRTH, pi.date_of_birth.as_str());
                    self.set(fields::GENDER, pi.gender.as_str());
                    self.set(fields::RESIDENTIAL_STATUS, pi.residential_status.as_str());
                    self.set(fields::EMPLOYER_NAME, pi.employer_name.as_str());
                }
            }
            WizardStep::IncomeSources => {
                if let Some(inc) = &draft.income_data {
                    self.set_amount(fields::SALARY, inc.salary);
                    self.set_amount(fields::HOUSE_PROPERTY, inc.house_property);
                    self.set_amount(fields::CAPITAL_GAINS_SHORT, inc.capital_gains_short);
                    self.set_amount(fields::CAPITAL_GAINS_LONG, inc.capital_gains_long);
                    self.set_amount(fields::BUSINESS_INCOME, inc.business_income);
                    self.set_amount(fields::OTHER_INCOME, inc.other_income);
                }
            }
            WizardStep::Deductions => {
                if let Some(ded) = &draft.deduction_data {
                    self.set_amount(fields::SECTION_80C, ded.section_80c);
                    self.set_amount(fields::SECTION_80CCD_1B, ded.section_80ccd_1b);
                    self.set_amount(fields::SECTION_80D, ded.section_80d);
                    self.set_amount(fields::SECTION_80G, ded.section_80g);
                    self.set_amount(fields::HRA_EXEMPTION, ded.hra_exemption);
                    self.set_amount(fields::HOME_LOAN_INTEREST, ded.home_loan_interest);
                    self.set_amount(fields::EDUCATION_LOAN_INTEREST, ded.education_loan_interest);
                    self.set_amount(fields::TDS_PAID, draft.tds_paid);
                }
            }
            WizardStep::TaxCalculation | WizardStep::Optimization | WizardStep::ReviewSubmit => {}
        }
    }

    fn set_amount(
        &mut self,
        name: &str,
        value: Decimal,
    ) {
        self.set(name, value.normalize().to_string());
    }
}

impl FieldSource for StagedInput {
    fn field(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.get(name)
    }
}

impl<K, V> FromIterator<(K, V)> for StagedInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut staged = StagedInput::new();
        for (k, v) in iter {
            staged.set(k, v);
        }
        staged
    }
}

/// Payload of the Deductions step: the deduction record plus TDS already paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionsPayload {
    pub deduction_data: DeductionData,
    pub tds_paid: Decimal,
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Reads `name` as an amount. Scientific notation such as `1e5` is accepted.
/// Absent, empty or unparseable input is zero.
pub fn amount(
    source: &impl FieldSource,
    name: &str,
) -> Decimal {
    let Some(raw) = source.field(name) else {
        return Decimal::ZERO;
    };
    let normalized = normalize_amount_input(raw);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized
        .parse::<Decimal>()
        .or_else(|e| Decimal::from_scientific(&normalized).map_err(|_| e))
        .unwrap_or_else(|e| {
            warn!(field = name, input = %raw, "non-numeric amount coerced to 0: {}", e);
            Decimal::ZERO
        })
}

/// Reads `name` as text. Absent input is the empty string.
pub fn text(
    source: &impl FieldSource,
    name: &str,
) -> String {
    source.field(name).unwrap_or_default().trim().to_string()
}

fn text_or(
    source: &impl FieldSource,
    name: &str,
    fallback: &str,
) -> String {
    let value = text(source, name);
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

pub fn collect_personal_info(source: &impl FieldSource) -> PersonalInfo {
    PersonalInfo {
        full_name: text(source, fields::FULL_NAME),
        pan: text(source, fields::PAN).to_uppercase(),
        date_of_birth: text(source, fields::DATE_OF_BIRTH),
        gender: text_or(source, fields::GENDER, "male"),
        residential_status: text_or(source, fields::RESIDENTIAL_STATUS, "resident"),
        employer_name: text(source, fields::EMPLOYER_NAME),
        employer_tan: String::new(),
    }
}

pub fn collect_income_data(source: &impl FieldSource) -> IncomeData {
    IncomeData {
        salary: amount(source, fields::SALARY),
        house_property: amount(source, fields::HOUSE_PROPERTY),
        capital_gains_short: amount(source, fields::CAPITAL_GAINS_SHORT),
        capital_gains_long: amount(source, fields::CAPITAL_GAINS_LONG),
        business_income: amount(source, fields::BUSINESS_INCOME),
        other_income: amount(source, fields::OTHER_INCOME),
        exempt_income: Decimal::ZERO,
    }
}

pub fn collect_deductions(source: &impl FieldSource) -> DeductionsPayload {
    DeductionsPayload {
        deduction_data: DeductionData {
            section_80c: amount(source, fields::SECTION_80C),
            section_80ccd_1b: amount(source, fields::SECTION_80CCD_1B),
            section_80d: amount(source, fields::SECTION_80D),
            section_80g: amount(source, fields::SECTION_80G),
            hra_exemption: amount(source, fields::HRA_EXEMPTION),
            home_loan_interest: amount(source, fields::HOME_LOAN_INTEREST),
            education_loan_interest: amount(source, fields::EDUCATION_LOAN_INTEREST),
            standard_deduction: STANDARD_DEDUCTION,
        },
        tds_paid: amount(source, fields::TDS_PAID),
    }
}
