//! The filing wizard: a six-step state machine over one [`FilingDraft`].
//!
//! | Index | Step             | On leave                | On arrival          |
//! |-------|------------------|-------------------------|---------------------|
//! | 0     | Personal Details | persist personal info   |                     |
//! | 1     | Income Sources   | persist income          |                     |
//! | 2     | Deductions       | persist deductions, TDS |                     |
//! | 3     | Tax Calculation  | requires a computation  | schedule computation|
//! | 4     | Optimization     |                         | schedule suggestions|
//! | 5     | Review & Submit  | (terminal)              |                     |
//!
//! The step index never moves past a persisting step whose update the
//! service has not confirmed.
//!
//! [`FilingDraft`]: crate::models::FilingDraft

pub mod controller;
pub mod error;
pub mod shared;
pub mod step;

pub use controller::{Advanced, SubFlowState, WizardController, WizardState};
pub use error::WizardError;
pub use shared::SharedWizard;
pub use step::{SubFlow, WizardStep};
