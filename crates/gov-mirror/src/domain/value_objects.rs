//! # Domain Value Objects
//!
//! Immutable value types for the reconciliation engine.

use gov_types::{BlockNumber, U256};
use serde::{Deserialize, Serialize};

/// Vote direction, in the governor's wire order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteSupport {
    /// Vote against the proposal (wire value 0).
    Against,
    /// Vote for the proposal (wire value 1).
    For,
    /// Abstain (wire value 2).
    Abstain,
}

impl VoteSupport {
    /// Decode the wire support byte. Anything outside 0..=2 is malformed.
    #[must_use]
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            2 => Some(Self::Abstain),
            _ => None,
        }
    }

    /// Encode as the wire support byte.
    #[must_use]
    pub fn to_wire(self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
            Self::Abstain => 2,
        }
    }
}

/// Accumulated vote weight per direction.
///
/// Locally-folded tallies are advisory; the next authoritative read
/// replaces them wholesale. Magnitudes never decrease between two
/// authoritative reads (votes are not retracted on-chain).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTally {
    /// Weight against.
    pub against: U256,
    /// Weight in favor.
    pub for_votes: U256,
    /// Abstaining weight.
    pub abstain: U256,
}

impl VoteTally {
    /// The zero tally.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Create a tally from the three magnitudes.
    #[must_use]
    pub fn new(against: U256, for_votes: U256, abstain: U256) -> Self {
        Self {
            against,
            for_votes,
            abstain,
        }
    }

    /// Get the magnitude for a direction.
    #[must_use]
    pub fn get(&self, support: VoteSupport) -> U256 {
        match support {
            VoteSupport::Against => self.against,
            VoteSupport::For => self.for_votes,
            VoteSupport::Abstain => self.abstain,
        }
    }
}

/// Proposal lifecycle state, in the governor's wire order.
///
/// Never derived locally: always obtained by authoritative query and
/// cached. The engine does not police transition order; the authoritative
/// source simply overwrites whatever was cached.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProposalState {
    /// Created, voting not yet open.
    Pending,
    /// Voting window open.
    Active,
    /// Withdrawn by the proposer or an admin.
    Canceled,
    /// Voting closed without reaching approval.
    Defeated,
    /// Approved, not yet queued.
    Succeeded,
    /// Waiting out the timelock delay.
    Queued,
    /// Queued but not executed within the grace period.
    Expired,
    /// Executed on-chain.
    Executed,
}

impl ProposalState {
    /// Decode the wire state byte. Anything outside 0..=7 is malformed.
    #[must_use]
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Canceled),
            3 => Some(Self::Defeated),
            4 => Some(Self::Succeeded),
            5 => Some(Self::Queued),
            6 => Some(Self::Expired),
            7 => Some(Self::Executed),
            _ => None,
        }
    }
}

/// The block-height boundary below which notifications are stale replays.
///
/// Unset until the first successful height observation; from then on it
/// only moves forward. Everything below the watermark has already been
/// accounted for by an authoritative resync, so replays are redundant by
/// construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Watermark(Option<BlockNumber>);

impl Watermark {
    /// Create an unset watermark.
    #[must_use]
    pub fn unset() -> Self {
        Self(None)
    }

    /// Whether a height has been observed yet.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// The current boundary, if set.
    #[must_use]
    pub fn get(&self) -> Option<BlockNumber> {
        self.0
    }

    /// Record an observed chain height. Sets the boundary on first
    /// observation; afterwards only ever moves it forward.
    pub fn observe(&mut self, height: BlockNumber) {
        match self.0 {
            None => self.0 = Some(height),
            Some(current) if height > current => self.0 = Some(height),
            Some(_) => {}
        }
    }

    /// Whether an event at `height` is live. False while unset, and for
    /// anything strictly below the boundary.
    #[must_use]
    pub fn accepts(&self, height: BlockNumber) -> bool {
        match self.0 {
            Some(boundary) => height >= boundary,
            None => false,
        }
    }
}

/// Governor-wide parameters read once per session.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GovernorParams {
    /// Blocks between proposal creation and voting start.
    pub voting_delay: u64,
    /// Length of the voting window in blocks.
    pub voting_period: u64,
    /// Minimum timelock delay before execution, in seconds.
    pub min_execution_delay: u64,
}
