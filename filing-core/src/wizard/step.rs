use std::fmt;

/// One stage of the wizard, in its fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    PersonalDetails,
    IncomeSources,
    Deductions,
    TaxCalculation,
    Optimization,
    ReviewSubmit,
}

/// Asynchronous work scheduled when a step is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubFlow {
    Computation,
    Suggestions,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::PersonalDetails,
        WizardStep::IncomeSources,
        WizardStep::Deductions,
        WizardStep::TaxCalculation,
        WizardStep::Optimization,
        WizardStep::ReviewSubmit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::PersonalDetails => "Personal Details",
            WizardStep::IncomeSources => "Income Sources",
            WizardStep::Deductions => "Deductions",
            WizardStep::TaxCalculation => "Tax Calculation",
            WizardStep::Optimization => "Optimization",
            WizardStep::ReviewSubmit => "Review & Submit",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Work to start once this step has been entered.
    pub fn sub_flow(self) -> Option<SubFlow> {
        match self {
            WizardStep::TaxCalculation => Some(SubFlow::Computation),
            WizardStep::Optimization => Some(SubFlow::Suggestions),
            _ => None,
        }
    }

    /// Whether leaving this step forward persists collected data first.
    pub fn persists(self) -> bool {
        matches!(
            self,
            WizardStep::PersonalDetails | WizardStep::IncomeSources | WizardStep::Deductions
        )
    }
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.title())
    }
}
