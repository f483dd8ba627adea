//! Repository port for case persistence and lookup.

use crate::closing::domain::{Case, CaseId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for case repository operations.
pub type CaseRepositoryResult<T> = Result<T, CaseRepositoryError>;

/// Case persistence contract.
///
/// Mutating operations on one case must be serialized by the host: `advance`
/// performs a read-check-then-write sequence that is not atomic across port
/// calls, so concurrent writers on the same case can corrupt the linear
/// stage invariant. A transactional host must span the case update and the
/// accompanying work-item inserts of one transition in a single transaction.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Stores a new case.
    ///
    /// # Errors
    ///
    /// Returns [`CaseRepositoryError::DuplicateCase`] when the case ID
    /// already exists.
    async fn store(&self, case: &Case) -> CaseRepositoryResult<()>;

    /// Persists changes to an existing case (stage pointer, history,
    /// workflow flags, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`CaseRepositoryError::NotFound`] when the case does not
    /// exist.
    async fn update(&self, case: &Case) -> CaseRepositoryResult<()>;

    /// Finds a case by identifier.
    ///
    /// Returns `None` when the case does not exist.
    async fn find_by_id(&self, id: CaseId) -> CaseRepositoryResult<Option<Case>>;
}

/// Errors returned by case repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CaseRepositoryError {
    /// A case with the same identifier already exists.
    #[error("duplicate case identifier: {0}")]
    DuplicateCase(CaseId),

    /// The case was not found.
    #[error("case not found: {0}")]
    NotFound(CaseId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
