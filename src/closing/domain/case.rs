//! Case aggregate root: the single closing transaction under management.

use super::history::EventAttributes;
use super::{
    CaseDomainError, CaseId, ClosingPlan, HistoryEntry, RoleAssignments, Stage,
    StageTransitionError,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of the buyer's earnest money deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarnestMoneyStatus {
    /// Not yet deposited.
    Pending,
    /// Deposited but not cleared.
    Deposited,
    /// Funds cleared and verified.
    Cleared,
    /// Returned to the buyer.
    Refunded,
    /// Applied to the down payment at closing.
    Applied,
}

impl EarnestMoneyStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deposited => "deposited",
            Self::Cleared => "cleared",
            Self::Refunded => "refunded",
            Self::Applied => "applied",
        }
    }
}

/// Input for opening a new case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSeed {
    property_address: String,
    purchase_price: f64,
    down_payment: Option<f64>,
    loan_amount: Option<f64>,
    earnest_money_amount: Option<f64>,
    roles: RoleAssignments,
}

impl CaseSeed {
    /// Creates a seed with the required fields.
    #[must_use]
    pub fn new(property_address: impl Into<String>, purchase_price: f64) -> Self {
        Self {
            property_address: property_address.into(),
            purchase_price,
            down_payment: None,
            loan_amount: None,
            earnest_money_amount: None,
            roles: RoleAssignments::new(),
        }
    }

    /// Sets the buyer's down payment amount.
    #[must_use]
    pub const fn with_down_payment(mut self, amount: f64) -> Self {
        self.down_payment = Some(amount);
        self
    }

    /// Sets the mortgage loan amount.
    #[must_use]
    pub const fn with_loan_amount(mut self, amount: f64) -> Self {
        self.loan_amount = Some(amount);
        self
    }

    /// Sets the agreed earnest money amount.
    #[must_use]
    pub const fn with_earnest_money_amount(mut self, amount: f64) -> Self {
        self.earnest_money_amount = Some(amount);
        self
    }

    /// Sets the role assignments.
    #[must_use]
    pub fn with_roles(mut self, roles: RoleAssignments) -> Self {
        self.roles = roles;
        self
    }
}

/// Parameter object for reconstructing a persisted case aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedCaseData {
    /// Persisted case identifier.
    pub id: CaseId,
    /// Persisted property address.
    pub property_address: String,
    /// Persisted purchase price.
    pub purchase_price: f64,
    /// Persisted down payment, if any.
    pub down_payment: Option<f64>,
    /// Persisted loan amount, if any.
    pub loan_amount: Option<f64>,
    /// Persisted earnest money amount, if any.
    pub earnest_money_amount: Option<f64>,
    /// Persisted earnest money status.
    pub earnest_money_status: EarnestMoneyStatus,
    /// Persisted earnest money deposit timestamp, if any.
    pub earnest_money_deposited_at: Option<DateTime<Utc>>,
    /// Persisted funds-verified flag.
    pub funds_verified: bool,
    /// Persisted funds verification timestamp, if any.
    pub funds_verified_at: Option<DateTime<Utc>>,
    /// Persisted funds verifier identity, if any.
    pub funds_verified_by: Option<String>,
    /// Persisted current stage.
    pub current_stage: Stage,
    /// Persisted stage-entry timestamp.
    pub stage_started_at: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted estimated closing timestamp.
    pub estimated_closing_date: DateTime<Utc>,
    /// Persisted actual closing timestamp, if closed.
    pub actual_closing_date: Option<DateTime<Utc>>,
    /// Persisted audit history.
    pub history: Vec<HistoryEntry>,
    /// Persisted role assignments.
    pub roles: RoleAssignments,
}

/// Case aggregate root.
///
/// The case exclusively owns its stage pointer and its append-only history;
/// every mutation appends exactly one history entry. The stage pointer only
/// ever moves forward along [`Stage::ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    id: CaseId,
    property_address: String,
    purchase_price: f64,
    down_payment: Option<f64>,
    loan_amount: Option<f64>,
    earnest_money_amount: Option<f64>,
    earnest_money_status: EarnestMoneyStatus,
    earnest_money_deposited_at: Option<DateTime<Utc>>,
    funds_verified: bool,
    funds_verified_at: Option<DateTime<Utc>>,
    funds_verified_by: Option<String>,
    current_stage: Stage,
    stage_started_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    estimated_closing_date: DateTime<Utc>,
    actual_closing_date: Option<DateTime<Utc>>,
    history: Vec<HistoryEntry>,
    roles: RoleAssignments,
}

impl Case {
    /// Opens a new case at the first stage.
    ///
    /// Seeds the history with a single stage-entry record and estimates the
    /// closing date from the full plan duration.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::EmptyPropertyAddress`] or
    /// [`CaseDomainError::NonPositivePurchasePrice`] when the seed fails
    /// validation.
    pub fn open(
        seed: CaseSeed,
        plan: &ClosingPlan,
        clock: &impl Clock,
    ) -> Result<Self, CaseDomainError> {
        let property_address = seed.property_address.trim().to_owned();
        if property_address.is_empty() {
            return Err(CaseDomainError::EmptyPropertyAddress);
        }
        if seed.purchase_price <= 0.0 {
            return Err(CaseDomainError::NonPositivePurchasePrice(
                seed.purchase_price,
            ));
        }

        let timestamp = clock.utc();
        let stage = Stage::first();
        Ok(Self {
            id: CaseId::new(),
            property_address,
            purchase_price: seed.purchase_price,
            down_payment: seed.down_payment,
            loan_amount: seed.loan_amount,
            earnest_money_amount: seed.earnest_money_amount,
            earnest_money_status: EarnestMoneyStatus::Pending,
            earnest_money_deposited_at: None,
            funds_verified: false,
            funds_verified_at: None,
            funds_verified_by: None,
            current_stage: stage,
            stage_started_at: timestamp,
            created_at: timestamp,
            estimated_closing_date: timestamp + Duration::days(i64::from(plan.total_days())),
            actual_closing_date: None,
            history: vec![HistoryEntry::StageEntered {
                stage,
                entered_at: timestamp,
                notes: Some("Case created".to_owned()),
                forced: false,
            }],
            roles: seed.roles,
        })
    }

    /// Reconstructs a case from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCaseData) -> Self {
        Self {
            id: data.id,
            property_address: data.property_address,
            purchase_price: data.purchase_price,
            down_payment: data.down_payment,
            loan_amount: data.loan_amount,
            earnest_money_amount: data.earnest_money_amount,
            earnest_money_status: data.earnest_money_status,
            earnest_money_deposited_at: data.earnest_money_deposited_at,
            funds_verified: data.funds_verified,
            funds_verified_at: data.funds_verified_at,
            funds_verified_by: data.funds_verified_by,
            current_stage: data.current_stage,
            stage_started_at: data.stage_started_at,
            created_at: data.created_at,
            estimated_closing_date: data.estimated_closing_date,
            actual_closing_date: data.actual_closing_date,
            history: data.history,
            roles: data.roles,
        }
    }

    /// Returns the case identifier.
    #[must_use]
    pub const fn id(&self) -> CaseId {
        self.id
    }

    /// Returns the property address.
    #[must_use]
    pub fn property_address(&self) -> &str {
        &self.property_address
    }

    /// Returns the purchase price.
    #[must_use]
    pub const fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    /// Returns the down payment, if recorded.
    #[must_use]
    pub const fn down_payment(&self) -> Option<f64> {
        self.down_payment
    }

    /// Returns the loan amount, if recorded.
    #[must_use]
    pub const fn loan_amount(&self) -> Option<f64> {
        self.loan_amount
    }

    /// Returns the agreed earnest money amount, if recorded.
    #[must_use]
    pub const fn earnest_money_amount(&self) -> Option<f64> {
        self.earnest_money_amount
    }

    /// Returns the earnest money status.
    #[must_use]
    pub const fn earnest_money_status(&self) -> EarnestMoneyStatus {
        self.earnest_money_status
    }

    /// Returns when the earnest money was deposited, if it has been.
    #[must_use]
    pub const fn earnest_money_deposited_at(&self) -> Option<DateTime<Utc>> {
        self.earnest_money_deposited_at
    }

    /// Returns whether the buyer's funds have been verified.
    #[must_use]
    pub const fn funds_verified(&self) -> bool {
        self.funds_verified
    }

    /// Returns when funds were verified, if they have been.
    #[must_use]
    pub const fn funds_verified_at(&self) -> Option<DateTime<Utc>> {
        self.funds_verified_at
    }

    /// Returns who verified the funds, if recorded.
    #[must_use]
    pub fn funds_verified_by(&self) -> Option<&str> {
        self.funds_verified_by.as_deref()
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.current_stage
    }

    /// Returns when the current stage was entered.
    #[must_use]
    pub const fn stage_started_at(&self) -> DateTime<Utc> {
        self.stage_started_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the estimated closing date.
    #[must_use]
    pub const fn estimated_closing_date(&self) -> DateTime<Utc> {
        self.estimated_closing_date
    }

    /// Returns the actual closing date, set on entering the terminal stage.
    #[must_use]
    pub const fn actual_closing_date(&self) -> Option<DateTime<Utc>> {
        self.actual_closing_date
    }

    /// Returns the audit history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the role assignments.
    #[must_use]
    pub const fn roles(&self) -> &RoleAssignments {
        &self.roles
    }

    /// Returns the first stage-entry record for the given stage, if the case
    /// has entered it.
    #[must_use]
    pub fn stage_entry(&self, stage: Stage) -> Option<&HistoryEntry> {
        self.history
            .iter()
            .find(|entry| entry.entered_stage() == Some(stage))
    }

    /// Moves the case into its successor stage.
    ///
    /// Appends one stage-entry history record, resets the stage timer,
    /// re-estimates the closing date from the remaining plan duration, and
    /// stamps the actual closing date when the terminal stage is entered.
    /// Requirement checking is the caller's concern; this method only
    /// enforces structural validity.
    ///
    /// # Errors
    ///
    /// Returns [`StageTransitionError::AlreadyComplete`] at the terminal
    /// stage.
    pub fn enter_next_stage(
        &mut self,
        plan: &ClosingPlan,
        notes: Option<String>,
        forced: bool,
        clock: &impl Clock,
    ) -> Result<Stage, StageTransitionError> {
        if self.current_stage.is_terminal() {
            return Err(StageTransitionError::AlreadyComplete(self.id));
        }
        let next = self
            .current_stage
            .next()
            .ok_or(StageTransitionError::NoSuccessor(self.current_stage))?;

        let timestamp = clock.utc();
        self.history.push(HistoryEntry::StageEntered {
            stage: next,
            entered_at: timestamp,
            notes,
            forced,
        });
        self.current_stage = next;
        self.stage_started_at = timestamp;
        self.estimated_closing_date =
            timestamp + Duration::days(i64::from(plan.remaining_days(next)));
        if next.is_terminal() {
            self.actual_closing_date = Some(timestamp);
        }
        Ok(next)
    }

    /// Records an earnest money deposit.
    ///
    /// Moves the earnest money status to deposited and appends one
    /// `earnest_money_deposited` event. The deposit never triggers
    /// requirement checks or task generation on its own.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::NonPositiveDepositAmount`] for zero or
    /// negative amounts.
    pub fn record_earnest_money_deposit(
        &mut self,
        amount: f64,
        deposited_at: Option<DateTime<Utc>>,
        notes: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), CaseDomainError> {
        if amount <= 0.0 {
            return Err(CaseDomainError::NonPositiveDepositAmount(amount));
        }
        let timestamp = clock.utc();
        let deposited = deposited_at.unwrap_or(timestamp);

        self.earnest_money_status = EarnestMoneyStatus::Deposited;
        self.earnest_money_deposited_at = Some(deposited);

        let mut attributes = EventAttributes::new();
        attributes.insert("amount".to_owned(), Value::from(amount));
        attributes.insert(
            "deposited_at".to_owned(),
            Value::from(deposited.to_rfc3339()),
        );
        if let Some(text) = notes {
            attributes.insert("notes".to_owned(), Value::from(text));
        }
        self.history.push(HistoryEntry::DomainEvent {
            name: "earnest_money_deposited".to_owned(),
            recorded_at: timestamp,
            attributes,
        });
        Ok(())
    }

    /// Records that the buyer's funds have been verified.
    ///
    /// Sets the funds-verified flag and appends one `funds_verified` event.
    ///
    /// # Errors
    ///
    /// Returns [`CaseDomainError::EmptyVerifier`] when the verifier identity
    /// is empty after trimming.
    pub fn record_funds_verification(
        &mut self,
        verified_by: impl Into<String>,
        method: Option<String>,
        notes: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), CaseDomainError> {
        let verifier = verified_by.into().trim().to_owned();
        if verifier.is_empty() {
            return Err(CaseDomainError::EmptyVerifier);
        }
        let timestamp = clock.utc();

        self.funds_verified = true;
        self.funds_verified_at = Some(timestamp);
        self.funds_verified_by = Some(verifier.clone());

        let mut attributes = EventAttributes::new();
        attributes.insert("verified_by".to_owned(), Value::from(verifier));
        if let Some(text) = method {
            attributes.insert("method".to_owned(), Value::from(text));
        }
        if let Some(text) = notes {
            attributes.insert("notes".to_owned(), Value::from(text));
        }
        self.history.push(HistoryEntry::DomainEvent {
            name: "funds_verified".to_owned(),
            recorded_at: timestamp,
            attributes,
        });
        Ok(())
    }
}
