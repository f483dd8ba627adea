//! Read-only port into the externally owned document collection.

use crate::closing::domain::{CaseId, DocumentKind};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for document directory operations.
pub type DocumentDirectoryResult<T> = Result<T, DocumentDirectoryError>;

/// Existence-check contract over supporting documents.
///
/// Documents are created, stored, and approved by an external collaborator;
/// the workflow core only ever asks whether an approved document of a given
/// kind exists for a case.
#[async_trait]
pub trait DocumentDirectory: Send + Sync {
    /// Returns `true` when at least one approved document of the given kind
    /// exists for the case.
    async fn has_approved(
        &self,
        case_id: CaseId,
        kind: DocumentKind,
    ) -> DocumentDirectoryResult<bool>;
}

/// Errors returned by document directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DocumentDirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
