//! Error types for closing domain validation and stage gating.

use super::{CaseId, DocumentKind, Stage, WorkItemId, WorkItemStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CaseDomainError {
    /// The property address is empty after trimming.
    #[error("property address must not be empty")]
    EmptyPropertyAddress,

    /// The purchase price is zero or negative.
    #[error("purchase price must be positive, got {0}")]
    NonPositivePurchasePrice(f64),

    /// The earnest money deposit amount is zero or negative.
    #[error("deposit amount must be positive, got {0}")]
    NonPositiveDepositAmount(f64),

    /// The funds verifier identity is empty after trimming.
    #[error("funds verifier must not be empty")]
    EmptyVerifier,

    /// The party identifier is empty after trimming.
    #[error("party identifier must not be empty")]
    EmptyPartyId,

    /// The work item cannot be started from its current status.
    #[error("work item {id} cannot start from status '{}'", status.as_str())]
    WorkItemNotStartable {
        /// Identifier of the affected work item.
        id: WorkItemId,
        /// Status the item held when the start was attempted.
        status: WorkItemStatus,
    },

    /// The work item cannot be completed from its current status.
    #[error("work item {id} cannot complete from status '{}'", status.as_str())]
    WorkItemNotCompletable {
        /// Identifier of the affected work item.
        id: WorkItemId,
        /// Status the item held when the completion was attempted.
        status: WorkItemStatus,
    },

    /// The work item cannot be cancelled once completed.
    #[error("work item {0} is completed and cannot be cancelled")]
    WorkItemNotCancellable(WorkItemId),
}

/// Errors for structurally impossible stage transitions.
///
/// These indicate programming or usage errors, never unmet business
/// requirements, and are not bypassed by a forced advance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageTransitionError {
    /// The case already sits in the terminal stage.
    #[error("case {0} is already complete")]
    AlreadyComplete(CaseId),

    /// The stage has no successor in the fixed order.
    #[error("stage '{}' has no successor", .0.as_str())]
    NoSuccessor(Stage),
}

/// Unmet business requirements preventing a stage exit.
///
/// The rendered message is intended to be surfaced verbatim to an operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageRequirementError {
    /// The case already sits in the terminal stage.
    #[error("case is already complete")]
    CaseAlreadyClosed,

    /// One or more blocking work items for the current stage are incomplete.
    #[error("blocking tasks incomplete: {}", titles.join(", "))]
    BlockingWorkItems {
        /// Titles of every outstanding blocking item, in store order.
        titles: Vec<String>,
    },

    /// A required document for the current stage has not been approved.
    #[error("required document '{}' not approved", kind.as_str())]
    MissingDocument {
        /// The document kind the current stage requires.
        kind: DocumentKind,
    },
}

/// Error returned while parsing stage names from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);
