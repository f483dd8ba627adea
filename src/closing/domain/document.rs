//! Document kinds referenced by stage requirements.
//!
//! Documents themselves are owned by an external collaborator; the core only
//! ever asks whether an approved document of a given kind exists for a case,
//! through the [`DocumentDirectory`](crate::closing::ports::DocumentDirectory)
//! port.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of document kinds used in a closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Contract between buyer and seller.
    PurchaseAgreement,
    /// Title search results showing ownership and liens.
    TitleReport,
    /// Bank statement or pre-approval letter.
    ProofOfFunds,
    /// Final settlement statement.
    ClosingDisclosure,
    /// Warranty or quitclaim deed transferring ownership.
    Deed,
    /// Hazard or homeowners insurance policy.
    InsurancePolicy,
    /// Home inspection report.
    InspectionReport,
    /// Property appraisal report.
    AppraisalReport,
    /// Proof of funds transfer.
    WireReceipt,
    /// Identity verification document.
    IdDocument,
    /// Miscellaneous documents.
    Other,
}

impl DocumentKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PurchaseAgreement => "purchase_agreement",
            Self::TitleReport => "title_report",
            Self::ProofOfFunds => "proof_of_funds",
            Self::ClosingDisclosure => "closing_disclosure",
            Self::Deed => "deed",
            Self::InsurancePolicy => "insurance_policy",
            Self::InspectionReport => "inspection_report",
            Self::AppraisalReport => "appraisal_report",
            Self::WireReceipt => "wire_receipt",
            Self::IdDocument => "id_document",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
