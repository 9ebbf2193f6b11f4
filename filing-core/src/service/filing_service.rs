use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Classification, FilingDraft, FilingId, FilingUpdate, SuggestionEntry, TaxComparison,
};

/// Failure reported by the remote filing service.
///
/// Authentication, retries and status-code mapping all happen inside the
/// implementation; callers only see which way a call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("filing not found")]
    NotFound,

    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// The remote capability the wizard persists through.
///
/// Every call is a single request/response. No operation retries on its own.
#[async_trait]
pub trait FilingService: Send + Sync {
    async fn create(
        &self,
        classification: &Classification,
    ) -> Result<FilingDraft, ServiceError>;

    async fn get(
        &self,
        id: &FilingId,
    ) -> Result<FilingDraft, ServiceError>;

    /// Partial update: keys left `None` in `fields` are untouched server-side.
    async fn update(
        &self,
        id: &FilingId,
        fields: &FilingUpdate,
    ) -> Result<FilingDraft, ServiceError>;

    async fn compute(
        &self,
        id: &FilingId,
    ) -> Result<TaxComparison, ServiceError>;

    /// Suggestions in server order.
    async fn suggestions(
        &self,
        id: &FilingId,
    ) -> Result<Vec<SuggestionEntry>, ServiceError>;
}
