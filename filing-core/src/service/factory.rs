use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::filing_service::{FilingService, ServiceError};

/// Backend-agnostic connection configuration.
///
/// `backend` must match the [`ServiceFactory::backend_name`] of a registered
/// factory. `endpoint` is passed through unchanged and its meaning is
/// backend-specific.
///
/// | backend | endpoint example                      |
/// |---------|---------------------------------------|
/// | `http`  | `http://localhost:8000`               |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub endpoint: String,
    /// Bearer credential attached to every request, if any.
    pub access_token: Option<String>,
    /// Per-request timeout enforced by the backend.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            endpoint: "http://localhost:8000".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// One implementation per service backend. Each backend crate exports a
/// single unit struct that implements this trait and is registered with a
/// [`ServiceRegistry`] at startup.
#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use service client.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn FilingService>, ServiceError>;
}

/// Registry of [`ServiceFactory`] instances, keyed by backend name.
pub struct ServiceRegistry {
    factories: HashMap<&'static str, Box<dyn ServiceFactory>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory. A factory with the same name is replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn ServiceFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`ServiceError::Configuration`] when no factory is registered for the
    ///   requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Arc<dyn FilingService>, ServiceError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                ServiceError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::{FilingService, ServiceConfig, ServiceError, ServiceFactory, ServiceRegistry};
    use crate::models::{
        Classification, FilingDraft, FilingId, FilingUpdate, SuggestionEntry, TaxComparison,
    };

    // ── stub service ─────────────────────────────────────────────────────
    // The registry tests never call into the service; they only check which
    // factory was asked to build it.
    struct StubService;

    #[async_trait]
    impl FilingService for StubService {
        async fn create(
            &self,
            _classification: &Classification,
        ) -> Result<FilingDraft, ServiceError> {
            unimplemented!()
        }
        async fn get(
            &self,
            _id: &FilingId,
        ) -> Result<FilingDraft, ServiceError> {
            unimplemented!()
        }
        async fn update(
            &self,
            _id: &FilingId,
            _fields: &FilingUpdate,
        ) -> Result<FilingDraft, ServiceError> {
            unimplemented!()
        }
        async fn compute(
            &self,
            _id: &FilingId,
        ) -> Result<TaxComparison, ServiceError> {
            unimplemented!()
        }
        async fn suggestions(
            &self,
            _id: &FilingId,
        ) -> Result<Vec<SuggestionEntry>, ServiceError> {
            unimplemented!()
        }
    }

    // ── stub factory ─────────────────────────────────────────────────────
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ServiceFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Arc<dyn FilingService>, ServiceError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Arc::new(StubService))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl ServiceFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }
        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Arc<dyn FilingService>, ServiceError> {
            Err(ServiceError::Transport("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn ServiceFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config_for(backend: &str) -> ServiceConfig {
        ServiceConfig {
            backend: backend.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn service_config_default_is_local_http() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.backend, "http");
        assert_eq!(cfg.endpoint, "http://localhost:8000");
        assert_eq!(cfg.access_token, None);
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(ServiceRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = ServiceRegistry::new();
        let (f1, _) = stub_factory("http");
        let (f2, _) = stub_factory("grpc");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["grpc", "http"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = ServiceRegistry::new();
        let (old, _) = stub_factory("http");
        let (new, _) = stub_factory("http");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["http"]);
    }

    #[tokio::test]
    async fn create_calls_matching_factory_only() {
        let mut reg = ServiceRegistry::new();
        let (http, http_called) = stub_factory("http");
        let (grpc, grpc_called) = stub_factory("grpc");
        reg.register(http);
        reg.register(grpc);

        let result = reg.create(&config_for("http")).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(http_called.load(Ordering::SeqCst));
        assert!(!grpc_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_names_requested_and_available() {
        let mut reg = ServiceRegistry::new();
        let (f, _) = stub_factory("http");
        reg.register(f);

        match reg.create(&config_for("carrier-pigeon")).await {
            Err(ServiceError::Configuration(msg)) => {
                assert!(msg.contains("carrier-pigeon"));
                assert!(msg.contains("http"));
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a service"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = ServiceRegistry::new();
        reg.register(Box::new(FailingFactory));

        let err = reg.create(&config_for("failing")).await.err();

        assert_eq!(
            err,
            Some(ServiceError::Transport("intentional failure".to_string()))
        );
    }
}
