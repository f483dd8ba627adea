//! Thread-safe in-memory implementation of all three closing ports.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::closing::{
    domain::{Case, CaseId, DocumentKind, Stage, WorkItem, WorkItemId, WorkItemStatus},
    ports::{
        CaseRepository, CaseRepositoryError, CaseRepositoryResult, DocumentDirectory,
        DocumentDirectoryError, DocumentDirectoryResult, WorkItemStore, WorkItemStoreError,
        WorkItemStoreResult,
    },
};

/// In-memory store implementing [`CaseRepository`], [`WorkItemStore`], and
/// [`DocumentDirectory`] behind a single lock.
///
/// Sharing one lock means a transition's case update and item inserts are
/// serialized against other writers, which satisfies the single-writer
/// requirement for single-process hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClosingStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    cases: HashMap<CaseId, Case>,
    work_items: HashMap<WorkItemId, WorkItem>,
    case_index: HashMap<CaseId, Vec<WorkItemId>>,
    approved_documents: HashSet<(CaseId, DocumentKind)>,
}

impl InMemoryClosingStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an approved document of the given kind as existing for a case.
    ///
    /// Stands in for the external document collaborator in tests.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDirectoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn approve_document(
        &self,
        case_id: CaseId,
        kind: DocumentKind,
    ) -> DocumentDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DocumentDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.approved_documents.insert((case_id, kind));
        Ok(())
    }
}

#[async_trait]
impl CaseRepository for InMemoryClosingStore {
    async fn store(&self, case: &Case) -> CaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.cases.contains_key(&case.id()) {
            return Err(CaseRepositoryError::DuplicateCase(case.id()));
        }
        state.cases.insert(case.id(), case.clone());
        Ok(())
    }

    async fn update(&self, case: &Case) -> CaseRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.cases.contains_key(&case.id()) {
            return Err(CaseRepositoryError::NotFound(case.id()));
        }
        state.cases.insert(case.id(), case.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CaseId) -> CaseRepositoryResult<Option<Case>> {
        let state = self.state.read().map_err(|err| {
            CaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.cases.get(&id).cloned())
    }
}

#[async_trait]
impl WorkItemStore for InMemoryClosingStore {
    async fn insert_many(&self, items: &[WorkItem]) -> WorkItemStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkItemStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(duplicate) = items
            .iter()
            .find(|item| state.work_items.contains_key(&item.id()))
        {
            return Err(WorkItemStoreError::DuplicateWorkItem(duplicate.id()));
        }
        for item in items {
            state
                .case_index
                .entry(item.case_id())
                .or_default()
                .push(item.id());
            state.work_items.insert(item.id(), item.clone());
        }
        Ok(())
    }

    async fn update(&self, item: &WorkItem) -> WorkItemStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkItemStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.work_items.contains_key(&item.id()) {
            return Err(WorkItemStoreError::NotFound(item.id()));
        }
        state.work_items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: WorkItemId) -> WorkItemStoreResult<Option<WorkItem>> {
        let state = self.state.read().map_err(|err| {
            WorkItemStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.work_items.get(&id).cloned())
    }

    async fn find_by_case(&self, case_id: CaseId) -> WorkItemStoreResult<Vec<WorkItem>> {
        let state = self.state.read().map_err(|err| {
            WorkItemStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_case_items(&state, case_id, |_| true))
    }

    async fn find_blocking_incomplete(
        &self,
        case_id: CaseId,
        stage: Stage,
    ) -> WorkItemStoreResult<Vec<WorkItem>> {
        let state = self.state.read().map_err(|err| {
            WorkItemStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_case_items(&state, case_id, |item| {
            item.stage() == stage
                && item.blocking()
                && item.status() != WorkItemStatus::Completed
        }))
    }
}

#[async_trait]
impl DocumentDirectory for InMemoryClosingStore {
    async fn has_approved(
        &self,
        case_id: CaseId,
        kind: DocumentKind,
    ) -> DocumentDirectoryResult<bool> {
        let state = self.state.read().map_err(|err| {
            DocumentDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.approved_documents.contains(&(case_id, kind)))
    }
}

/// Collects a case's items in insertion order, filtered by a predicate.
fn collect_case_items(
    state: &InMemoryState,
    case_id: CaseId,
    predicate: impl Fn(&WorkItem) -> bool,
) -> Vec<WorkItem> {
    state
        .case_index
        .get(&case_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.work_items.get(id))
                .filter(|item| predicate(item))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
