//! The fixed, ordered stage sequence of a closing case.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven ordered milestones a case passes through.
///
/// The declaration order is the workflow order: no branching, no skipping.
/// Storage strings are the canonical wire values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    /// Offer accepted and escrow being opened.
    #[serde(rename = "offer_accepted")]
    OfferAccepted,
    /// Title company researching ownership and liens.
    #[serde(rename = "title_search_ordered")]
    TitleSearch,
    /// Lender reviewing the loan application; inspections underway.
    #[serde(rename = "lender_underwriting")]
    Underwriting,
    /// All loan conditions met; ready to prepare final documents.
    #[serde(rename = "clear_to_close")]
    ClearToClose,
    /// Closing disclosure and final paperwork being prepared.
    #[serde(rename = "final_documents_prepared")]
    FinalDocuments,
    /// Documents signed and funds wired.
    #[serde(rename = "funding_and_signing")]
    FundingSigning,
    /// Deed recorded with the county; the case is complete.
    #[serde(rename = "recording_complete")]
    RecordingComplete,
}

impl Stage {
    /// All stages in workflow order.
    pub const ORDER: [Self; 7] = [
        Self::OfferAccepted,
        Self::TitleSearch,
        Self::Underwriting,
        Self::ClearToClose,
        Self::FinalDocuments,
        Self::FundingSigning,
        Self::RecordingComplete,
    ];

    /// Returns the first stage of the workflow.
    #[must_use]
    pub const fn first() -> Self {
        Self::OfferAccepted
    }

    /// Returns the zero-based position of this stage in the workflow order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::OfferAccepted => 0,
            Self::TitleSearch => 1,
            Self::Underwriting => 2,
            Self::ClearToClose => 3,
            Self::FinalDocuments => 4,
            Self::FundingSigning => 5,
            Self::RecordingComplete => 6,
        }
    }

    /// Returns the successor stage, or `None` at the terminal stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::OfferAccepted => Some(Self::TitleSearch),
            Self::TitleSearch => Some(Self::Underwriting),
            Self::Underwriting => Some(Self::ClearToClose),
            Self::ClearToClose => Some(Self::FinalDocuments),
            Self::FinalDocuments => Some(Self::FundingSigning),
            Self::FundingSigning => Some(Self::RecordingComplete),
            Self::RecordingComplete => None,
        }
    }

    /// Returns `true` for the terminal stage.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::RecordingComplete)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OfferAccepted => "offer_accepted",
            Self::TitleSearch => "title_search_ordered",
            Self::Underwriting => "lender_underwriting",
            Self::ClearToClose => "clear_to_close",
            Self::FinalDocuments => "final_documents_prepared",
            Self::FundingSigning => "funding_and_signing",
            Self::RecordingComplete => "recording_complete",
        }
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "offer_accepted" => Ok(Self::OfferAccepted),
            "title_search_ordered" => Ok(Self::TitleSearch),
            "lender_underwriting" => Ok(Self::Underwriting),
            "clear_to_close" => Ok(Self::ClearToClose),
            "final_documents_prepared" => Ok(Self::FinalDocuments),
            "funding_and_signing" => Ok(Self::FundingSigning),
            "recording_complete" => Ok(Self::RecordingComplete),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
