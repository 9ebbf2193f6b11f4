use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use filing_core::{FilingService, ServiceConfig, ServiceError, ServiceFactory};

use crate::client::HttpFilingService;

/// [`ServiceFactory`] for the REST filing API.
///
/// ```rust,no_run
/// use filing_core::ServiceRegistry;
/// use filing_http::HttpServiceFactory;
///
/// let mut registry = ServiceRegistry::new();
/// registry.register(Box::new(HttpServiceFactory));
/// ```
pub struct HttpServiceFactory;

#[async_trait]
impl ServiceFactory for HttpServiceFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// `config.endpoint` is the API base URL, e.g. `http://localhost:8000`.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn FilingService>, ServiceError> {
        let service = HttpFilingService::new(config)?;
        info!(endpoint = %config.endpoint, "using http filing service");
        Ok(Arc::new(service))
    }
}
