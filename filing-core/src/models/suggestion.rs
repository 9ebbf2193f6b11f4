use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One optimization hint. The list is kept in the order the service sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub category: String,
    pub title: String,
    pub description: String,
    pub potential_saving: Decimal,
    pub priority: Priority,
}

impl SuggestionEntry {
    pub fn has_saving(&self) -> bool {
        self.potential_saving > Decimal::ZERO
    }
}
