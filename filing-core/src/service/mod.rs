pub mod factory;
pub mod filing_service;

pub use factory::{ServiceConfig, ServiceFactory, ServiceRegistry};
pub use filing_service::{FilingService, ServiceError};
