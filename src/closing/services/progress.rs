//! Read-only progress and timeline views over a case.

use crate::closing::domain::{Case, ClosingPlan, HistoryEntry, Stage};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;

/// Completion status of one stage in the progress view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The case has passed this stage.
    Complete,
    /// The case currently sits in this stage.
    Current,
    /// The case has not reached this stage.
    Pending,
}

/// Progress detail for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageProgress {
    /// The stage being described.
    pub stage: Stage,
    /// Zero-based position in the workflow order.
    pub position: usize,
    /// Completion status relative to the case's stage pointer.
    pub status: StageStatus,
    /// When the stage was entered, recovered from history.
    pub entered_at: Option<DateTime<Utc>>,
    /// Notes recorded with the stage entry, if any.
    pub notes: Option<String>,
}

/// Stage-by-stage progress view of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseProgress {
    /// The case's current stage.
    pub current_stage: Stage,
    /// Zero-based index of the current stage.
    pub current_index: usize,
    /// Total number of stages in the workflow.
    pub total_stages: usize,
    /// Floor percentage of workflow positions passed; 100 at the terminal
    /// stage.
    pub percent_complete: u8,
    /// Per-stage detail in workflow order.
    pub stages: Vec<StageProgress>,
}

/// Computes progress, stage-age, and closing estimates for a case.
///
/// Every view is recomputed fresh from the live case on each call; nothing
/// is cached.
#[derive(Clone)]
pub struct ProgressTracker<C>
where
    C: Clock + Send + Sync,
{
    plan: Arc<ClosingPlan>,
    clock: Arc<C>,
}

impl<C> ProgressTracker<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new progress tracker.
    #[must_use]
    pub const fn new(plan: Arc<ClosingPlan>, clock: Arc<C>) -> Self {
        Self { plan, clock }
    }

    /// Builds the stage-by-stage progress view.
    ///
    /// The percentage is `floor(100 * index / (total - 1))`, so the first
    /// stage reads 0% and the terminal stage reads 100%.
    #[must_use]
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "progress is reported as a floor percentage"
    )]
    pub fn progress(&self, case: &Case) -> CaseProgress {
        let current_index = case.current_stage().index();
        let total_stages = Stage::ORDER.len();
        let last_position = total_stages.saturating_sub(1).max(1);
        let percent_complete =
            u8::try_from((100 * current_index) / last_position).unwrap_or(100);

        let stages = Stage::ORDER
            .iter()
            .map(|stage| {
                let position = stage.index();
                let status = match position.cmp(&current_index) {
                    std::cmp::Ordering::Less => StageStatus::Complete,
                    std::cmp::Ordering::Equal => StageStatus::Current,
                    std::cmp::Ordering::Greater => StageStatus::Pending,
                };
                let (entered_at, notes) = match case.stage_entry(*stage) {
                    Some(HistoryEntry::StageEntered {
                        entered_at, notes, ..
                    }) => (Some(*entered_at), notes.clone()),
                    _ => (None, None),
                };
                StageProgress {
                    stage: *stage,
                    position,
                    status,
                    entered_at,
                    notes,
                }
            })
            .collect();

        CaseProgress {
            current_stage: case.current_stage(),
            current_index,
            total_stages,
            percent_complete,
            stages,
        }
    }

    /// Returns whole days elapsed since the current stage was entered,
    /// clamped at zero.
    #[must_use]
    pub fn days_in_current_stage(&self, case: &Case) -> i64 {
        (self.clock.utc() - case.stage_started_at()).num_days().max(0)
    }

    /// Estimates the days remaining until the closing completes.
    ///
    /// Sums the nominal durations from the current stage through the
    /// terminal stage inclusive; returns 0 once the case sits in the
    /// terminal stage. Recomputed fresh on each call so it always reflects
    /// the live stage pointer.
    #[must_use]
    pub fn estimate_days_to_close(&self, case: &Case) -> u32 {
        if case.current_stage().is_terminal() {
            return 0;
        }
        self.plan.remaining_days(case.current_stage())
    }
}
