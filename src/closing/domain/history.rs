//! Append-only audit history entries for a case.

use super::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form attributes carried by a domain event entry.
pub type EventAttributes = serde_json::Map<String, serde_json::Value>;

/// One immutable entry in a case's audit history.
///
/// Entries are discriminated by an explicit tag rather than by probing for
/// field presence, so consumers never have to sniff the payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// The case entered a stage.
    StageEntered {
        /// The stage that was entered.
        stage: Stage,
        /// When the stage was entered.
        entered_at: DateTime<Utc>,
        /// Operator notes recorded with the transition.
        notes: Option<String>,
        /// Whether requirement checks were bypassed.
        forced: bool,
    },
    /// A workflow event that did not change the stage pointer.
    DomainEvent {
        /// Event name, e.g. `earnest_money_deposited`.
        name: String,
        /// When the event was recorded.
        recorded_at: DateTime<Utc>,
        /// Event-specific attributes.
        attributes: EventAttributes,
    },
}

impl HistoryEntry {
    /// Returns the entered stage for stage-entry events.
    #[must_use]
    pub const fn entered_stage(&self) -> Option<Stage> {
        match self {
            Self::StageEntered { stage, .. } => Some(*stage),
            Self::DomainEvent { .. } => None,
        }
    }

    /// Returns the event name for domain events.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        match self {
            Self::StageEntered { .. } => None,
            Self::DomainEvent { name, .. } => Some(name),
        }
    }

    /// Returns the timestamp of the entry regardless of its variant.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::StageEntered { entered_at, .. } => *entered_at,
            Self::DomainEvent { recorded_at, .. } => *recorded_at,
        }
    }
}
