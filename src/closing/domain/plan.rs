//! Data-driven closing plan: stage durations, document requirements, and
//! work-item templates.
//!
//! Keeping these tables in configuration rather than in control-flow code
//! lets a host alter the workflow without touching the orchestration logic.
//! [`ClosingPlan::standard`] carries the built-in seven-stage plan; hosts may
//! deserialize an alternative plan from JSON instead.

use super::{CaseRole, DocumentKind, Stage, WorkItemCategory, WorkItemPriority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nominal duration applied when a deserialized plan omits a stage.
pub const DEFAULT_STAGE_DURATION_DAYS: u16 = 2;

const fn default_duration_days() -> u16 {
    DEFAULT_STAGE_DURATION_DAYS
}

/// Template for one work item seeded on stage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemTemplate {
    title: String,
    description: String,
    category: WorkItemCategory,
    role: CaseRole,
    blocking: bool,
    priority: WorkItemPriority,
}

impl WorkItemTemplate {
    /// Creates a work item template.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: WorkItemCategory,
        role: CaseRole,
        blocking: bool,
        priority: WorkItemPriority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            role,
            blocking,
            priority,
        }
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
    pub const fn role(&self) -> CaseRole {
        self.role
    }

    /// Returns whether the item blocks its stage's exit.
    #[must_use]
    pub const fn blocking(&self) -> bool {
        self.blocking
    }

    /// Returns the item priority.
    #[must_use]
    pub const fn priority(&self) -> WorkItemPriority {
        self.priority
    }
}

/// Per-stage plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    /// Nominal stage duration in days, used for estimation only.
    #[serde(default = "default_duration_days")]
    duration_days: u16,
    /// Document kinds that must be approved before leaving the stage.
    #[serde(default)]
    required_documents: Vec<DocumentKind>,
    /// Work items seeded when the stage is entered.
    #[serde(default)]
    work_items: Vec<WorkItemTemplate>,
}

impl StagePlan {
    /// Creates a stage plan with the given nominal duration.
    #[must_use]
    pub const fn new(duration_days: u16) -> Self {
        Self {
            duration_days,
            required_documents: Vec::new(),
            work_items: Vec::new(),
        }
    }

    /// Sets the documents required to leave the stage.
    #[must_use]
    pub fn with_required_documents(mut self, documents: impl IntoIterator<Item = DocumentKind>) -> Self {
        self.required_documents = documents.into_iter().collect();
        self
    }

    /// Sets the work items seeded on stage entry.
    #[must_use]
    pub fn with_work_items(mut self, items: impl IntoIterator<Item = WorkItemTemplate>) -> Self {
        self.work_items = items.into_iter().collect();
        self
    }

    /// Returns the nominal duration in days.
    #[must_use]
    pub const fn duration_days(&self) -> u16 {
        self.duration_days
    }

    /// Returns the required document kinds.
    #[must_use]
    pub fn required_documents(&self) -> &[DocumentKind] {
        &self.required_documents
    }

    /// Returns the work-item templates.
    #[must_use]
    pub fn work_items(&self) -> &[WorkItemTemplate] {
        &self.work_items
    }
}

/// The full per-stage plan consumed by the workflow services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPlan {
    #[serde(default)]
    stages: BTreeMap<Stage, StagePlan>,
}

impl ClosingPlan {
    /// Creates a plan from explicit per-stage entries.
    #[must_use]
    pub fn new(stages: impl IntoIterator<Item = (Stage, StagePlan)>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Returns the nominal duration of a stage in days.
    ///
    /// Falls back to [`DEFAULT_STAGE_DURATION_DAYS`] when the plan has no
    /// entry for the stage.
    #[must_use]
    pub fn duration_days(&self, stage: Stage) -> u16 {
        self.stages
            .get(&stage)
            .map_or(DEFAULT_STAGE_DURATION_DAYS, StagePlan::duration_days)
    }

    /// Returns the document kinds that must be approved to leave a stage.
    #[must_use]
    pub fn required_documents(&self, stage: Stage) -> &[DocumentKind] {
        self.stages
            .get(&stage)
            .map_or(&[], StagePlan::required_documents)
    }

    /// Returns the work-item templates seeded when a stage is entered.
    #[must_use]
    pub fn templates_for(&self, stage: Stage) -> &[WorkItemTemplate] {
        self.stages.get(&stage).map_or(&[], StagePlan::work_items)
    }

    /// Sums the nominal durations from the given stage through the terminal
    /// stage, inclusive.
    #[must_use]
    pub fn remaining_days(&self, from: Stage) -> u32 {
        Stage::ORDER
            .iter()
            .skip(from.index())
            .map(|stage| u32::from(self.duration_days(*stage)))
            .sum()
    }

    /// Sums the nominal durations of the whole workflow.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        self.remaining_days(Stage::first())
    }

    /// Returns the built-in seven-stage closing plan.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            (
                Stage::OfferAccepted,
                StagePlan::new(1).with_work_items([
                    WorkItemTemplate::new(
                        "Deposit earnest money",
                        "Buyer must deposit earnest money to escrow account",
                        WorkItemCategory::Payment,
                        CaseRole::Buyer,
                        true,
                        WorkItemPriority::Critical,
                    ),
                    WorkItemTemplate::new(
                        "Upload proof of funds",
                        "Upload bank statement or pre-approval letter",
                        WorkItemCategory::DocumentUpload,
                        CaseRole::Buyer,
                        true,
                        WorkItemPriority::High,
                    ),
                    WorkItemTemplate::new(
                        "Open escrow account",
                        "Title company to open escrow account",
                        WorkItemCategory::Other,
                        CaseRole::TitleOfficer,
                        true,
                        WorkItemPriority::High,
                    ),
                ]),
            ),
            (
                Stage::TitleSearch,
                StagePlan::new(2).with_work_items([
                    WorkItemTemplate::new(
                        "Order title search",
                        "Title company to search property records",
                        WorkItemCategory::Other,
                        CaseRole::TitleOfficer,
                        true,
                        WorkItemPriority::Critical,
                    ),
                    WorkItemTemplate::new(
                        "Review title report",
                        "Review title search results for issues",
                        WorkItemCategory::DocumentReview,
                        CaseRole::TitleOfficer,
                        true,
                        WorkItemPriority::High,
                    ),
                ]),
            ),
            (
                Stage::Underwriting,
                StagePlan::new(4)
                    .with_required_documents([DocumentKind::ProofOfFunds])
                    .with_work_items([
                        WorkItemTemplate::new(
                            "Submit loan application",
                            "Complete and submit mortgage application",
                            WorkItemCategory::Other,
                            CaseRole::Buyer,
                            true,
                            WorkItemPriority::Critical,
                        ),
                        WorkItemTemplate::new(
                            "Schedule home inspection",
                            "Hire inspector and schedule inspection",
                            WorkItemCategory::Inspection,
                            CaseRole::Buyer,
                            false,
                            WorkItemPriority::Normal,
                        ),
                        WorkItemTemplate::new(
                            "Order appraisal",
                            "Lender to order property appraisal",
                            WorkItemCategory::Other,
                            CaseRole::LoanOfficer,
                            true,
                            WorkItemPriority::High,
                        ),
                        WorkItemTemplate::new(
                            "Verify employment",
                            "Lender to verify buyer employment and income",
                            WorkItemCategory::Verification,
                            CaseRole::LoanOfficer,
                            true,
                            WorkItemPriority::High,
                        ),
                    ]),
            ),
            (
                Stage::ClearToClose,
                StagePlan::new(1)
                    .with_required_documents([DocumentKind::InsurancePolicy])
                    .with_work_items([
                        WorkItemTemplate::new(
                            "Obtain clear to close",
                            "Final underwriting approval from lender",
                            WorkItemCategory::Approval,
                            CaseRole::LoanOfficer,
                            true,
                            WorkItemPriority::Critical,
                        ),
                        WorkItemTemplate::new(
                            "Upload insurance policy",
                            "Provide proof of homeowners insurance",
                            WorkItemCategory::DocumentUpload,
                            CaseRole::Buyer,
                            true,
                            WorkItemPriority::High,
                        ),
                    ]),
            ),
            (
                Stage::FinalDocuments,
                StagePlan::new(2)
                    .with_required_documents([DocumentKind::ClosingDisclosure])
                    .with_work_items([
                        WorkItemTemplate::new(
                            "Prepare closing disclosure",
                            "Title company prepares final settlement statement",
                            WorkItemCategory::Other,
                            CaseRole::TitleOfficer,
                            true,
                            WorkItemPriority::Critical,
                        ),
                        WorkItemTemplate::new(
                            "Review closing disclosure",
                            "Buyer and seller review closing costs",
                            WorkItemCategory::DocumentReview,
                            CaseRole::Buyer,
                            true,
                            WorkItemPriority::High,
                        ),
                        WorkItemTemplate::new(
                            "Prepare deed",
                            "Title company prepares property deed",
                            WorkItemCategory::Other,
                            CaseRole::TitleOfficer,
                            true,
                            WorkItemPriority::High,
                        ),
                    ]),
            ),
            (
                Stage::FundingSigning,
                StagePlan::new(2).with_work_items([
                    WorkItemTemplate::new(
                        "Wire down payment",
                        "Buyer to wire down payment funds to escrow",
                        WorkItemCategory::Payment,
                        CaseRole::Buyer,
                        true,
                        WorkItemPriority::Critical,
                    ),
                    WorkItemTemplate::new(
                        "Sign closing documents",
                        "Buyer and seller sign all closing documents",
                        WorkItemCategory::DocumentSign,
                        CaseRole::Buyer,
                        true,
                        WorkItemPriority::Critical,
                    ),
                    WorkItemTemplate::new(
                        "Lender funds loan",
                        "Lender wires loan amount to escrow",
                        WorkItemCategory::Payment,
                        CaseRole::LoanOfficer,
                        true,
                        WorkItemPriority::Critical,
                    ),
                ]),
            ),
            (
                Stage::RecordingComplete,
                StagePlan::new(1)
                    .with_required_documents([DocumentKind::Deed])
                    .with_work_items([
                        WorkItemTemplate::new(
                            "Record deed",
                            "County recorder records deed and transfer",
                            WorkItemCategory::Other,
                            CaseRole::TitleOfficer,
                            true,
                            WorkItemPriority::Critical,
                        ),
                        WorkItemTemplate::new(
                            "Disburse funds",
                            "Escrow disburses funds to seller and vendors",
                            WorkItemCategory::Payment,
                            CaseRole::TitleOfficer,
                            true,
                            WorkItemPriority::High,
                        ),
                    ]),
            ),
        ])
    }
}
