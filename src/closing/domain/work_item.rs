//! Work item aggregate and its lifecycle types.

use super::{
    CaseDomainError, CaseId, CaseRole, PartyId, Stage, WorkItemId, WorkItemTemplate,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Category of work a closing item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemCategory {
    /// Upload a specific document.
    DocumentUpload,
    /// Sign a document.
    DocumentSign,
    /// Review and approve a document.
    DocumentReview,
    /// Make a payment.
    Payment,
    /// Verify funds, employment, or insurance.
    Verification,
    /// Schedule or complete a property inspection.
    Inspection,
    /// Obtain an approval.
    Approval,
    /// Informational item, no action required.
    Notification,
    /// Miscellaneous work.
    Other,
}

/// Work item lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    /// Created, not yet started.
    Pending,
    /// Someone is working on it.
    InProgress,
    /// Finished successfully.
    Completed,
    /// No longer needed.
    Cancelled,
}

impl WorkItemStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Work item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemPriority {
    /// Nice to have.
    Low,
    /// Standard work.
    Normal,
    /// Important, likely gating progress.
    High,
    /// Urgent, definitely gating progress.
    Critical,
}

/// One action item generated for a case stage.
///
/// A blocking item must reach [`WorkItemStatus::Completed`] before its
/// originating stage can be left. Completed items are immutable; late
/// re-completion is a no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    case_id: CaseId,
    title: String,
    description: String,
    category: WorkItemCategory,
    assigned_role: CaseRole,
    assigned_to: Option<PartyId>,
    status: WorkItemStatus,
    priority: WorkItemPriority,
    due_date: DateTime<Utc>,
    blocking: bool,
    stage: Stage,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    completed_by: Option<String>,
}

impl WorkItem {
    /// Creates a pending work item from a plan template.
    #[must_use]
    pub fn from_template(
        template: &WorkItemTemplate,
        case_id: CaseId,
        stage: Stage,
        assigned_to: Option<PartyId>,
        due_date: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkItemId::new(),
            case_id,
            title: template.title().to_owned(),
            description: template.description().to_owned(),
            category: template.category(),
            assigned_role: template.role(),
            assigned_to,
            status: WorkItemStatus::Pending,
            priority: template.priority(),
            due_date,
            blocking: template.blocking(),
            stage,
            created_at: timestamp,
            updated_at: timestamp,
            started_at: None,
            completed_at: None,
            completed_by: None,
        }
    }

    /// Returns the work item identifier.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.id
    }

    /// Returns the owning case identifier.
    #[must_use]
    pub const fn case_id(&self) -> CaseId {
        self.case_id
    }

    /// Returns the item title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the item description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the item category.
    #[must_use]
    pub const fn category(&self) -> WorkItemCategory {
        self.category
    }

    /// Returns the role responsible for the item.
    #[must_use]
    pub const fn assigned_role(&self) -> CaseRole {
        self.assigned_role
    }

    /// Returns the assigned party, if the role was assigned at generation.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&PartyId> {
        self.assigned_to.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> WorkItemStatus {
        self.status
    }

    /// Returns the item priority.
    #[must_use]
    pub const fn priority(&self) -> WorkItemPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns whether the item blocks its stage's exit.
    #[must_use]
    pub const fn blocking(&self) -> bool {
        self.blocking
    }

    /// Returns the stage the item was generated for.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when work began, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the item was completed, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns who completed the item, if recorded.
    #[must_use]
    pub fn completed_by(&self) -> Option<&str> {
        self.completed_by.as_deref()
    }

    /// Returns `true` when the item is past due and still open.
    ///
    /// Overdue is a derived property surfaced to callers; it never causes a
    /// state change.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            WorkItemStatus::Pending | WorkItemStatus::InProgress
        ) && self.due_date < now
    }

    /// Marks the item as in progress.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::WorkItemNotStartable`] unless the item is
    /// pending.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), CaseDomainError> {
        if self.status != WorkItemStatus::Pending {
            return Err(CaseDomainError::WorkItemNotStartable {
                id: self.id,
                status: self.status,
            });
        }
        let timestamp = clock.utc();
        self.status = WorkItemStatus::InProgress;
        self.started_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Marks the item as completed.
    ///
    /// Completing an already-completed item is a no-op that preserves the
    /// original completion timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::WorkItemNotCompletable`] when the item was
    /// cancelled.
    pub fn complete(
        &mut self,
        completed_by: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), CaseDomainError> {
        match self.status {
            WorkItemStatus::Completed => Ok(()),
            WorkItemStatus::Cancelled => Err(CaseDomainError::WorkItemNotCompletable {
                id: self.id,
                status: self.status,
            }),
            WorkItemStatus::Pending | WorkItemStatus::InProgress => {
                let timestamp = clock.utc();
                self.status = WorkItemStatus::Completed;
                self.completed_at = Some(timestamp);
                self.completed_by = completed_by;
                self.updated_at = timestamp;
                Ok(())
            }
        }
    }

    /// Marks the item as cancelled.
    ///
    /// Cancelling an already-cancelled item is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::WorkItemNotCancellable`] when the item has
    /// been completed.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), CaseDomainError> {
        match self.status {
            WorkItemStatus::Cancelled => Ok(()),
            WorkItemStatus::Completed => Err(CaseDomainError::WorkItemNotCancellable(self.id)),
            WorkItemStatus::Pending | WorkItemStatus::InProgress => {
                self.status = WorkItemStatus::Cancelled;
                self.updated_at = clock.utc();
                Ok(())
            }
        }
    }
}
