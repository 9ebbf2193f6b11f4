use thiserror::Error;

use super::WizardStep;
use crate::models::Regime;
use crate::service::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("could not create filing draft: {source}")]
    Initialization { source: ServiceError },

    #[error("could not save {step}: {source}")]
    Persistence {
        step: WizardStep,
        source: ServiceError,
    },

    #[error("tax computation failed: {source}")]
    Computation { source: ServiceError },

    #[error("could not load suggestions: {source}")]
    Suggestion { source: ServiceError },

    #[error("submission failed: {source}")]
    Submission { source: ServiceError },

    /// Non-fatal: the recommended regime is shown locally but the service
    /// did not record it.
    #[error("could not save recommended regime ({}): {source}", .regime.label())]
    RegimeSync {
        regime: Regime,
        source: ServiceError,
    },

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the final step; submit instead")]
    AtFinalStep,

    #[error("tax computation has not completed")]
    ComputationUnresolved,

    #[error("{operation} is only available on {expected} (current step: {actual})")]
    WrongStep {
        operation: &'static str,
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("submit is only available on Review & Submit (current step: {0})")]
    NotAtReview(WizardStep),

    #[error("filing has already been submitted")]
    AlreadySubmitted,

    #[error("another wizard command is still in progress")]
    Busy,
}

impl WizardError {
    /// The step the failure belongs to, where one applies.
    pub fn step(&self) -> Option<WizardStep> {
        match self {
            WizardError::Persistence { step, .. } => Some(*step),
            WizardError::Computation { .. } | WizardError::RegimeSync { .. } => {
                Some(WizardStep::TaxCalculation)
            }
            WizardError::Suggestion { .. } => Some(WizardStep::Optimization),
            WizardError::Submission { .. } => Some(WizardStep::ReviewSubmit),
            WizardError::WrongStep { actual, .. } | WizardError::NotAtReview(actual) => {
                Some(*actual)
            }
            _ => None,
        }
    }

    /// The underlying service failure, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            WizardError::Initialization { source }
            | WizardError::Persistence { source, .. }
            | WizardError::Computation { source }
            | WizardError::Suggestion { source }
            | WizardError::Submission { source }
            | WizardError::RegimeSync { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether the same command may simply be issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WizardError::Persistence { .. }
                | WizardError::Computation { .. }
                | WizardError::Suggestion { .. }
                | WizardError::Submission { .. }
                | WizardError::Busy
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn persistence_error_names_the_step() {
        let err = WizardError::Persistence {
            step: WizardStep::IncomeSources,
            source: ServiceError::NotFound,
        };

        assert_eq!(err.step(), Some(WizardStep::IncomeSources));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("could not save Income Sources"));
    }

    #[test]
    fn navigation_errors_carry_no_service_error() {
        assert_eq!(WizardError::AtFinalStep.service_error(), None);
        assert!(!WizardError::AlreadySubmitted.is_retryable());
    }
}
