//! Orchestration service coordinating the closing workflow.

use crate::closing::{
    domain::{
        Case, CaseDomainError, CaseId, CaseSeed, ClosingPlan, StageRequirementError,
        StageTransitionError, WorkItem, WorkItemId,
    },
    ports::{
        CaseRepository, CaseRepositoryError, DocumentDirectory, DocumentDirectoryError,
        WorkItemStore, WorkItemStoreError,
    },
    services::{
        AdvanceCheck, ProgressTracker, RequirementCheckError, RequirementChecker, TaskGenerator,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::CaseProgress;

/// Service-level errors for closing workflow operations.
#[derive(Debug, Error)]
pub enum CaseWorkflowError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CaseDomainError),
    /// The requested transition is structurally impossible.
    #[error(transparent)]
    Transition(#[from] StageTransitionError),
    /// Business requirements for leaving the stage are unmet.
    #[error("cannot advance stage: {0}")]
    Requirement(#[from] StageRequirementError),
    /// The case repository failed.
    #[error(transparent)]
    Cases(#[from] CaseRepositoryError),
    /// The work item store failed.
    #[error(transparent)]
    WorkItems(#[from] WorkItemStoreError),
    /// The document directory failed.
    #[error(transparent)]
    Documents(#[from] DocumentDirectoryError),
}

impl From<RequirementCheckError> for CaseWorkflowError {
    fn from(err: RequirementCheckError) -> Self {
        match err {
            RequirementCheckError::WorkItems(inner) => Self::WorkItems(inner),
            RequirementCheckError::Documents(inner) => Self::Documents(inner),
        }
    }
}

/// Result type for closing workflow operations.
pub type CaseWorkflowResult<T> = Result<T, CaseWorkflowError>;

/// Coordinates requirement checking, stage transitions, task generation,
/// and progress views for closing cases.
///
/// Mutating operations on one case must be serialized by the host (a
/// per-case lock or a single-writer transaction boundary): `advance` is a
/// read-check-then-write sequence that is not atomic across port calls.
/// Operations on different cases are independent.
#[derive(Clone)]
pub struct CaseOrchestrator<R, W, D, C>
where
    R: CaseRepository,
    W: WorkItemStore,
    D: DocumentDirectory,
    C: Clock + Send + Sync,
{
    cases: Arc<R>,
    work_items: Arc<W>,
    checker: RequirementChecker<W, D>,
    generator: TaskGenerator<W, C>,
    tracker: ProgressTracker<C>,
    plan: Arc<ClosingPlan>,
    clock: Arc<C>,
}

impl<R, W, D, C> CaseOrchestrator<R, W, D, C>
where
    R: CaseRepository,
    W: WorkItemStore,
    D: DocumentDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new orchestrator over the given ports and plan.
    #[must_use]
    pub fn new(
        cases: Arc<R>,
        work_items: Arc<W>,
        documents: Arc<D>,
        plan: Arc<ClosingPlan>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            cases,
            work_items: Arc::clone(&work_items),
            checker: RequirementChecker::new(
                Arc::clone(&work_items),
                documents,
                Arc::clone(&plan),
            ),
            generator: TaskGenerator::new(work_items, Arc::clone(&plan), Arc::clone(&clock)),
            tracker: ProgressTracker::new(Arc::clone(&plan), Arc::clone(&clock)),
            plan,
            clock,
        }
    }

    /// Opens a new case at the first stage and seeds its initial work
    /// items.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError`] when seed validation fails or
    /// persistence rejects the new case.
    pub async fn create(&self, seed: CaseSeed) -> CaseWorkflowResult<Case> {
        let case = Case::open(seed, &self.plan, &*self.clock)?;
        self.cases.store(&case).await?;
        let items = self.generator.generate(&case, case.current_stage()).await?;
        info!(case_id = %case.id(), stage = %case.current_stage(), items = items.len(), "opened closing case");
        Ok(case)
    }

    /// Looks up a case by identifier.
    ///
    /// Returns `Ok(None)` when no case exists.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::Cases`] when the lookup fails.
    pub async fn find_case(&self, id: CaseId) -> CaseWorkflowResult<Option<Case>> {
        Ok(self.cases.find_by_id(id).await?)
    }

    /// Decides whether the case may leave its current stage.
    ///
    /// Side-effect-free; callable any number of times for display.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError`] when a backing store fails.
    pub async fn can_advance(&self, case: &Case) -> CaseWorkflowResult<AdvanceCheck> {
        Ok(self.checker.can_advance(case).await?)
    }

    /// Advances the case into its next stage.
    ///
    /// Unless `force` is set, requirements are checked first and an unmet
    /// requirement aborts the call with the case untouched. A forced
    /// advance bypasses requirement checks only; it never advances past the
    /// terminal stage. On success the stage pointer moves, one history
    /// entry is appended, the timeline estimate is refreshed, and the new
    /// stage's work items are generated and returned.
    ///
    /// The transition mutates a scratch copy and commits in order: item
    /// generation, case update, then the caller's aggregate. A failure at
    /// any point leaves both the stored case and the caller's aggregate at
    /// the old stage, so gating is never evaluated against a half-entered
    /// stage. A failed case update can strand already-inserted items for
    /// the never-entered stage; they gate nothing, because gate queries
    /// filter on the committed stage pointer.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::Transition`] at the terminal stage,
    /// [`CaseWorkflowError::Requirement`] when requirements are unmet, or a
    /// store error when persistence fails.
    pub async fn advance(
        &self,
        case: &mut Case,
        notes: Option<String>,
        force: bool,
    ) -> CaseWorkflowResult<Vec<WorkItem>> {
        if case.current_stage().is_terminal() {
            return Err(StageTransitionError::AlreadyComplete(case.id()).into());
        }
        if !force {
            if let AdvanceCheck::Blocked(reason) = self.checker.can_advance(case).await? {
                return Err(reason.into());
            }
        }

        let mut staged = case.clone();
        let entered = staged.enter_next_stage(&self.plan, notes, force, &*self.clock)?;
        let items = self.generator.generate(&staged, entered).await?;
        self.cases.update(&staged).await?;

        if force {
            warn!(case_id = %staged.id(), stage = %entered, "forced stage advance");
        } else {
            info!(case_id = %staged.id(), stage = %entered, "stage advanced");
        }
        *case = staged;
        Ok(items)
    }

    /// Records an earnest money deposit as a domain event.
    ///
    /// Never checks requirements or generates tasks; it only makes a later
    /// advance more likely to pass.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::Domain`] for a non-positive amount or a
    /// store error when persistence fails.
    pub async fn deposit_earnest_money(
        &self,
        case: &mut Case,
        amount: f64,
        deposited_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> CaseWorkflowResult<()> {
        case.record_earnest_money_deposit(amount, deposited_at, notes, &*self.clock)?;
        self.cases.update(case).await?;
        info!(case_id = %case.id(), amount, "earnest money deposit recorded");
        Ok(())
    }

    /// Records that the buyer's funds have been verified.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::Domain`] for an empty verifier or a
    /// store error when persistence fails.
    pub async fn verify_funds(
        &self,
        case: &mut Case,
        verified_by: String,
        method: Option<String>,
        notes: Option<String>,
    ) -> CaseWorkflowResult<()> {
        case.record_funds_verification(verified_by, method, notes, &*self.clock)?;
        self.cases.update(case).await?;
        info!(case_id = %case.id(), "funds verified");
        Ok(())
    }

    /// Marks a work item as in progress.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::WorkItems`] when the item does not
    /// exist and [`CaseWorkflowError::Domain`] when it cannot start.
    pub async fn start_work_item(&self, id: WorkItemId) -> CaseWorkflowResult<WorkItem> {
        let mut item = self.require_work_item(id).await?;
        item.start(&*self.clock)?;
        self.work_items.update(&item).await?;
        Ok(item)
    }

    /// Marks a work item as completed.
    ///
    /// Completing an already-completed item is a no-op that preserves the
    /// original completion record.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::WorkItems`] when the item does not
    /// exist and [`CaseWorkflowError::Domain`] when it was cancelled.
    pub async fn complete_work_item(
        &self,
        id: WorkItemId,
        completed_by: Option<String>,
    ) -> CaseWorkflowResult<WorkItem> {
        let mut item = self.require_work_item(id).await?;
        item.complete(completed_by, &*self.clock)?;
        self.work_items.update(&item).await?;
        Ok(item)
    }

    /// Marks a work item as cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`CaseWorkflowError::WorkItems`] when the item does not
    /// exist and [`CaseWorkflowError::Domain`] when it was completed.
    pub async fn cancel_work_item(&self, id: WorkItemId) -> CaseWorkflowResult<WorkItem> {
        let mut item = self.require_work_item(id).await?;
        item.cancel(&*self.clock)?;
        self.work_items.update(&item).await?;
        Ok(item)
    }

    /// Builds the stage-by-stage progress view for a case.
    #[must_use]
    pub fn progress(&self, case: &Case) -> CaseProgress {
        self.tracker.progress(case)
    }

    /// Returns whole days elapsed in the current stage.
    #[must_use]
    pub fn days_in_current_stage(&self, case: &Case) -> i64 {
        self.tracker.days_in_current_stage(case)
    }

    /// Estimates the days remaining until closing completes.
    #[must_use]
    pub fn estimate_days_to_close(&self, case: &Case) -> u32 {
        self.tracker.estimate_days_to_close(case)
    }

    async fn require_work_item(&self, id: WorkItemId) -> CaseWorkflowResult<WorkItem> {
        self.work_items
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkItemStoreError::NotFound(id).into())
    }
}
