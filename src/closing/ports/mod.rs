//! Port contracts for closing workflow management.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow
//! services: case persistence, the work-item store, and the read-only
//! document directory.

pub mod cases;
pub mod documents;
pub mod work_items;

pub use cases::{CaseRepository, CaseRepositoryError, CaseRepositoryResult};
pub use documents::{DocumentDirectory, DocumentDirectoryError, DocumentDirectoryResult};
pub use work_items::{WorkItemStore, WorkItemStoreError, WorkItemStoreResult};
