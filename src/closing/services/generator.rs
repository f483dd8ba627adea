//! Template-driven work item generation on stage entry.

use crate::closing::{
    domain::{Case, ClosingPlan, Stage, WorkItem},
    ports::{WorkItemStore, WorkItemStoreResult},
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Seeds the work items a stage's plan template defines.
///
/// Generation is not idempotent: calling it twice for the same stage entry
/// produces duplicate items. The orchestrator guarantees exactly one call
/// per stage-entry event.
#[derive(Clone)]
pub struct TaskGenerator<W, C>
where
    W: WorkItemStore,
    C: Clock + Send + Sync,
{
    work_items: Arc<W>,
    plan: Arc<ClosingPlan>,
    clock: Arc<C>,
}

impl<W, C> TaskGenerator<W, C>
where
    W: WorkItemStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task generator.
    #[must_use]
    pub const fn new(work_items: Arc<W>, plan: Arc<ClosingPlan>, clock: Arc<C>) -> Self {
        Self {
            work_items,
            plan,
            clock,
        }
    }

    /// Creates and persists the work items for a stage entry.
    ///
    /// Each template's role is resolved through the case's role assignments;
    /// an unassigned role yields an unassigned item, not an error. Due dates
    /// are the stage's nominal duration from now.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemStoreError`](crate::closing::ports::WorkItemStoreError)
    /// when persistence fails.
    pub async fn generate(&self, case: &Case, stage: Stage) -> WorkItemStoreResult<Vec<WorkItem>> {
        let due_date =
            self.clock.utc() + Duration::days(i64::from(self.plan.duration_days(stage)));
        let items: Vec<WorkItem> = self
            .plan
            .templates_for(stage)
            .iter()
            .map(|template| {
                let assignee = case.roles().party_for(template.role()).cloned();
                WorkItem::from_template(
                    template,
                    case.id(),
                    stage,
                    assignee,
                    due_date,
                    &*self.clock,
                )
            })
            .collect();

        if !items.is_empty() {
            self.work_items.insert_many(&items).await?;
        }
        debug!(case_id = %case.id(), stage = %stage, count = items.len(), "generated stage work items");
        Ok(items)
    }
}
