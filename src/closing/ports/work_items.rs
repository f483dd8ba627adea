//! Store port for work item persistence and stage-gate queries.

use crate::closing::domain::{CaseId, Stage, WorkItem, WorkItemId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for work item store operations.
pub type WorkItemStoreResult<T> = Result<T, WorkItemStoreError>;

/// Work item persistence contract.
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    /// Stores a batch of newly generated work items.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemStoreError::DuplicateWorkItem`] when any item ID
    /// already exists; no item from the batch is stored in that case.
    async fn insert_many(&self, items: &[WorkItem]) -> WorkItemStoreResult<()>;

    /// Persists changes to an existing work item (status, completion
    /// fields, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemStoreError::NotFound`] when the item does not
    /// exist.
    async fn update(&self, item: &WorkItem) -> WorkItemStoreResult<()>;

    /// Finds a work item by identifier.
    ///
    /// Returns `None` when the item does not exist.
    async fn find_by_id(&self, id: WorkItemId) -> WorkItemStoreResult<Option<WorkItem>>;

    /// Returns all work items belonging to a case, in insertion order.
    async fn find_by_case(&self, case_id: CaseId) -> WorkItemStoreResult<Vec<WorkItem>>;

    /// Returns the blocking items for a case stage whose status is not
    /// completed, in insertion order.
    ///
    /// Cancelled blocking items still count as outstanding; cancelling a
    /// gate does not open it.
    async fn find_blocking_incomplete(
        &self,
        case_id: CaseId,
        stage: Stage,
    ) -> WorkItemStoreResult<Vec<WorkItem>>;
}

/// Errors returned by work item store implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkItemStoreError {
    /// A work item with the same identifier already exists.
    #[error("duplicate work item identifier: {0}")]
    DuplicateWorkItem(WorkItemId),

    /// The work item was not found.
    #[error("work item not found: {0}")]
    NotFound(WorkItemId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkItemStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
