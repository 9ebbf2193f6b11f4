pub mod chart;
pub mod collect;
pub mod models;
pub mod service;
pub mod wizard;

pub use collect::{DeductionsPayload, FieldSource, StagedInput};
pub use models::*;
pub use service::{FilingService, ServiceConfig, ServiceError, ServiceFactory, ServiceRegistry};
pub use wizard::{
    Advanced, SharedWizard, SubFlow, SubFlowState, WizardController, WizardError, WizardState,
    WizardStep,
};
