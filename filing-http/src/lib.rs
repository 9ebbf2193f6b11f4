mod client;
mod factory;

pub use client::HttpFilingService;
pub use factory::HttpServiceFactory;
