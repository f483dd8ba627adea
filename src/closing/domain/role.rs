//! Case roles and the role-to-party assignment map.

use super::PartyId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named role a party can hold on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseRole {
    /// The purchasing party.
    Buyer,
    /// The selling party.
    Seller,
    /// Agent representing the buyer.
    BuyerAgent,
    /// Agent representing the seller.
    SellerAgent,
    /// Lender representative handling the loan.
    LoanOfficer,
    /// Title company officer handling escrow and recording.
    TitleOfficer,
}

impl CaseRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::BuyerAgent => "buyer_agent",
            Self::SellerAgent => "seller_agent",
            Self::LoanOfficer => "loan_officer",
            Self::TitleOfficer => "title_officer",
        }
    }
}

impl fmt::Display for CaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-to-party assignments for a case.
///
/// Every role is optional: an unassigned role resolves to `None` and yields
/// unassigned work items rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignments {
    buyer: Option<PartyId>,
    seller: Option<PartyId>,
    buyer_agent: Option<PartyId>,
    seller_agent: Option<PartyId>,
    loan_officer: Option<PartyId>,
    title_officer: Option<PartyId>,
}

impl RoleAssignments {
    /// Creates an empty assignment map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the buyer role.
    #[must_use]
    pub fn with_buyer(mut self, party: PartyId) -> Self {
        self.buyer = Some(party);
        self
    }

    /// Assigns the seller role.
    #[must_use]
    pub fn with_seller(mut self, party: PartyId) -> Self {
        self.seller = Some(party);
        self
    }

    /// Assigns the buyer's agent role.
    #[must_use]
    pub fn with_buyer_agent(mut self, party: PartyId) -> Self {
        self.buyer_agent = Some(party);
        self
    }

    /// Assigns the seller's agent role.
    #[must_use]
    pub fn with_seller_agent(mut self, party: PartyId) -> Self {
        self.seller_agent = Some(party);
        self
    }

    /// Assigns the loan officer role.
    #[must_use]
    pub fn with_loan_officer(mut self, party: PartyId) -> Self {
        self.loan_officer = Some(party);
        self
    }

    /// Assigns the title officer role.
    #[must_use]
    pub fn with_title_officer(mut self, party: PartyId) -> Self {
        self.title_officer = Some(party);
        self
    }

    /// Resolves a role to its assigned party, if any.
    #[must_use]
    pub const fn party_for(&self, role: CaseRole) -> Option<&PartyId> {
        match role {
            CaseRole::Buyer => self.buyer.as_ref(),
            CaseRole::Seller => self.seller.as_ref(),
            CaseRole::BuyerAgent => self.buyer_agent.as_ref(),
            CaseRole::SellerAgent => self.seller_agent.as_ref(),
            CaseRole::LoanOfficer => self.loan_officer.as_ref(),
            CaseRole::TitleOfficer => self.title_officer.as_ref(),
        }
    }
}
