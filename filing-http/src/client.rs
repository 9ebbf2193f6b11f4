use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use filing_core::{
    Classification, FilingDraft, FilingId, FilingService, FilingUpdate, ServiceConfig,
    ServiceError, SuggestionEntry, TaxComparison,
};

/// [`FilingService`] over the filing REST API.
///
/// | Operation     | Request                                |
/// |---------------|----------------------------------------|
/// | `create`      | `POST /api/filings/`                   |
/// | `get`         | `GET  /api/filings/{id}`               |
/// | `update`      | `PUT  /api/filings/{id}`               |
/// | `compute`     | `POST /api/filings/{id}/calculate`     |
/// | `suggestions` | `GET  /api/filings/{id}/suggestions`   |
pub struct HttpFilingService {
    http: Client,
    base: Url,
    access_token: Option<String>,
}

impl HttpFilingService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let base = Url::parse(config.endpoint.trim_end_matches('/')).map_err(|e| {
            ServiceError::Configuration(format!("invalid endpoint {:?}: {e}", config.endpoint))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ServiceError::Configuration(format!(
                "endpoint must be http or https, got {:?}",
                config.endpoint
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            base,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn url(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
    ) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "filing service request");
        let builder = self.http.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let response = check_status(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        self.send(self.request(method, path).json(body)).await
    }
}

/// Maps a non-2xx response onto [`ServiceError`], preferring the API's
/// `detail` message over the raw body.
async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        detail: error_detail(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
    })
}

fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.to_string());
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
        None => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl FilingService for HttpFilingService {
    async fn create(
        &self,
        classification: &Classification,
    ) -> Result<FilingDraft, ServiceError> {
        self.send_json(Method::POST, "/api/filings/", classification)
            .await
    }

    async fn get(
        &self,
        id: &FilingId,
    ) -> Result<FilingDraft, ServiceError> {
        self.send(self.request(Method::GET, &format!("/api/filings/{id}")))
            .await
    }

    async fn update(
        &self,
        id: &FilingId,
        update: &FilingUpdate,
    ) -> Result<FilingDraft, ServiceError> {
        self.send_json(Method::PUT, &format!("/api/filings/{id}"), update)
            .await
    }

    async fn compute(
        &self,
        id: &FilingId,
    ) -> Result<TaxComparison, ServiceError> {
        self.send(self.request(Method::POST, &format!("/api/filings/{id}/calculate")))
            .await
    }

    async fn suggestions(
        &self,
        id: &FilingId,
    ) -> Result<Vec<SuggestionEntry>, ServiceError> {
        self.send(self.request(Method::GET, &format!("/api/filings/{id}/suggestions")))
            .await
    }
}
