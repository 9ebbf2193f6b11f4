use std::fmt;

use serde::{Deserialize, Serialize};

/// The two alternative rule sets a filer chooses between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    #[default]
    New,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Old => "Old Regime",
            Self::New => "New Regime",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItrType {
    #[default]
    #[serde(rename = "ITR-1")]
    Itr1,
    #[serde(rename = "ITR-2")]
    Itr2,
    #[serde(rename = "ITR-3")]
    Itr3,
    #[serde(rename = "ITR-4")]
    Itr4,
}

/// Immutable fields fixed when a filing is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    pub financial_year: String,
    pub assessment_year: String,
    pub itr_type: ItrType,
    pub regime: Regime,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            financial_year: "2025-2026".to_string(),
            assessment_year: "2026-2027".to_string(),
            itr_type: ItrType::Itr1,
            regime: Regime::New,
        }
    }
}
