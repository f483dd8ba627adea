//! Domain model for closing workflow management.
//!
//! The closing domain models the case aggregate, its fixed stage sequence,
//! the work items that gate stage exits, and the append-only audit history,
//! while keeping all infrastructure concerns outside of the domain boundary.

mod case;
mod document;
mod error;
mod history;
mod ids;
mod plan;
mod role;
mod stage;
mod work_item;

pub use case::{Case, CaseSeed, EarnestMoneyStatus, PersistedCaseData};
pub use document::DocumentKind;
pub use error::{
    CaseDomainError, ParseStageError, StageRequirementError, StageTransitionError,
};
pub use history::{EventAttributes, HistoryEntry};
pub use ids::{CaseId, PartyId, WorkItemId};
pub use plan::{ClosingPlan, StagePlan, WorkItemTemplate, DEFAULT_STAGE_DURATION_DAYS};
pub use role::{CaseRole, RoleAssignments};
pub use stage::Stage;
pub use work_item::{WorkItem, WorkItemCategory, WorkItemPriority, WorkItemStatus};
