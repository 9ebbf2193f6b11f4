//! Answers for the input steps, read from a TOML file.
//!
//! ```toml
//! [personal]
//! full_name = "Asha Rao"
//! pan = "ABCDE1234F"
//!
//! [income]
//! salary = 1200000
//!
//! [deductions]
//! section_80c = "1,50,000"
//! tds_paid = 80000
//! ```
//!
//! Values may be strings or numbers; they are staged as text and coerced by
//! the step collectors exactly like typed input.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use filing_core::WizardStep;
use filing_core::collect::{StagedInput, fields};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WizardInputs {
    pub personal: BTreeMap<String, toml::Value>,
    pub income: BTreeMap<String, toml::Value>,
    pub deductions: BTreeMap<String, toml::Value>,
}

impl WizardInputs {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read inputs file '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid inputs file '{}'", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Staged values for `step`; empty for steps that take no input.
    pub fn staged_for(
        &self,
        step: WizardStep,
    ) -> StagedInput {
        let (section, known) = match step {
            WizardStep::PersonalDetails => (&self.personal, fields::PERSONAL),
            WizardStep::IncomeSources => (&self.income, fields::INCOME),
            WizardStep::Deductions => (&self.deductions, fields::DEDUCTIONS),
            _ => return StagedInput::new(),
        };

        section
            .iter()
            .filter(|(name, _)| {
                let ok = known.contains(&name.as_str());
                if !ok {
                    warn!(step = %step, field = %name, "ignoring unknown input field");
                }
                ok
            })
            .map(|(name, value)| (name.clone(), as_text(value)))
            .collect()
    }
}

fn as_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
