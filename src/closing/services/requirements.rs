//! Requirement evaluation deciding whether a case may leave its stage.

use crate::closing::{
    domain::{Case, ClosingPlan, StageRequirementError},
    ports::{
        DocumentDirectory, DocumentDirectoryError, WorkItemStore, WorkItemStoreError,
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Outcome of a requirement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceCheck {
    /// Every requirement for leaving the current stage is met.
    Eligible,
    /// The first unmet requirement, in evaluation order.
    Blocked(StageRequirementError),
}

impl AdvanceCheck {
    /// Returns `true` when the case may advance.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Returns the unmet requirement, if any.
    #[must_use]
    pub const fn blocked_reason(&self) -> Option<&StageRequirementError> {
        match self {
            Self::Eligible => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}

/// Infrastructure failures during requirement evaluation.
#[derive(Debug, Error)]
pub enum RequirementCheckError {
    /// The work item store failed.
    #[error(transparent)]
    WorkItems(#[from] WorkItemStoreError),
    /// The document directory failed.
    #[error(transparent)]
    Documents(#[from] DocumentDirectoryError),
}

/// Read-only evaluator of stage-exit requirements.
///
/// Checking is side-effect-free and may be called any number of times,
/// including purely for display.
#[derive(Clone)]
pub struct RequirementChecker<W, D>
where
    W: WorkItemStore,
    D: DocumentDirectory,
{
    work_items: Arc<W>,
    documents: Arc<D>,
    plan: Arc<ClosingPlan>,
}

impl<W, D> RequirementChecker<W, D>
where
    W: WorkItemStore,
    D: DocumentDirectory,
{
    /// Creates a new requirement checker.
    #[must_use]
    pub const fn new(work_items: Arc<W>, documents: Arc<D>, plan: Arc<ClosingPlan>) -> Self {
        Self {
            work_items,
            documents,
            plan,
        }
    }

    /// Decides whether the case may leave its current stage.
    ///
    /// Evaluation order, first failure wins: terminal check, outstanding
    /// blocking work items, required document approvals.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementCheckError`] when a backing store fails; an
    /// unmet requirement is reported through [`AdvanceCheck::Blocked`], not
    /// as an error.
    pub async fn can_advance(&self, case: &Case) -> Result<AdvanceCheck, RequirementCheckError> {
        let stage = case.current_stage();
        if stage.is_terminal() {
            return Ok(AdvanceCheck::Blocked(
                StageRequirementError::CaseAlreadyClosed,
            ));
        }

        let outstanding = self
            .work_items
            .find_blocking_incomplete(case.id(), stage)
            .await?;
        if !outstanding.is_empty() {
            let titles: Vec<String> = outstanding
                .iter()
                .map(|item| item.title().to_owned())
                .collect();
            debug!(case_id = %case.id(), stage = %stage, blockers = titles.len(), "advance blocked by work items");
            return Ok(AdvanceCheck::Blocked(
                StageRequirementError::BlockingWorkItems { titles },
            ));
        }

        for kind in self.plan.required_documents(stage) {
            if !self.documents.has_approved(case.id(), *kind).await? {
                debug!(case_id = %case.id(), stage = %stage, document = %kind, "advance blocked by missing document");
                return Ok(AdvanceCheck::Blocked(
                    StageRequirementError::MissingDocument { kind: *kind },
                ));
            }
        }

        Ok(AdvanceCheck::Eligible)
    }
}
