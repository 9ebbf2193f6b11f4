use serde::{Deserialize, Serialize};

/// Lifecycle of a filing record as tracked by the remote service.
///
/// `Calculated` and `Filed` are set server-side; the wizard itself only ever
/// requests `InProgress` and `Submitted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Draft,
    InProgress,
    Calculated,
    Submitted,
    Filed,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Calculated => "calculated",
            Self::Submitted => "submitted",
            Self::Filed => "filed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "in_progress" => Some(Self::InProgress),
            "calculated" => Some(Self::Calculated),
            "submitted" => Some(Self::Submitted),
            "filed" => Some(Self::Filed),
            _ => None,
        }
    }

    /// Status only moves forward. Re-applying the current status is allowed so
    /// that a repeated step completion (or a retried submit) stays harmless.
    pub fn can_transition_to(
        &self,
        next: FilingStatus,
    ) -> bool {
        next >= *self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn as_str_and_parse_agree() {
        for status in [
            FilingStatus::Draft,
            FilingStatus::InProgress,
            FilingStatus::Calculated,
            FilingStatus::Submitted,
            FilingStatus::Filed,
        ] {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(FilingStatus::parse("archived"), None);
    }

    #[test]
    fn status_never_moves_backwards() {
        assert!(FilingStatus::Draft.can_transition_to(FilingStatus::InProgress));
        assert!(FilingStatus::InProgress.can_transition_to(FilingStatus::InProgress));
        assert!(FilingStatus::Calculated.can_transition_to(FilingStatus::Submitted));
        assert!(!FilingStatus::Submitted.can_transition_to(FilingStatus::InProgress));
        assert!(!FilingStatus::Calculated.can_transition_to(FilingStatus::Draft));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&FilingStatus::InProgress).unwrap();

        assert_eq!(json, "\"in_progress\"");
    }
}
