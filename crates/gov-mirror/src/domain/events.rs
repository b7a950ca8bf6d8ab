//! # Domain Events
//!
//! The closed set of normalized governance events. Raw feed notifications
//! are translated into exactly these variants at the normalizer boundary;
//! nothing downstream inspects raw payloads.

use gov_types::{Address, BlockNumber, ProposalId, U256};
use serde::{Deserialize, Serialize};

use super::entities::ProposalPayload;
use super::value_objects::VoteSupport;

/// A normalized governance event, carrying its emitting block height.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GovernorEvent {
    /// A proposal was created. The id is recomputed from the payload, not
    /// taken from the wire.
    Created {
        /// Canonical id (recomputed).
        id: ProposalId,
        /// Submitting account.
        proposer: Address,
        /// The immutable payload.
        payload: ProposalPayload,
        /// Emitting block height.
        block_number: BlockNumber,
    },

    /// A vote was cast on a proposal.
    VoteCast {
        /// Proposal voted on.
        proposal_id: ProposalId,
        /// Vote direction.
        support: VoteSupport,
        /// Voting weight applied.
        weight: U256,
        /// Emitting block height.
        block_number: BlockNumber,
    },

    /// A proposal was queued for execution.
    Queued {
        /// Proposal that was queued.
        proposal_id: ProposalId,
        /// Emitting block height.
        block_number: BlockNumber,
    },

    /// A proposal's calls were executed.
    Executed {
        /// Proposal that was executed.
        proposal_id: ProposalId,
        /// Emitting block height.
        block_number: BlockNumber,
    },
}

impl GovernorEvent {
    /// The proposal this event refers to.
    #[must_use]
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::Created { id, .. } => *id,
            Self::VoteCast { proposal_id, .. }
            | Self::Queued { proposal_id, .. }
            | Self::Executed { proposal_id, .. } => *proposal_id,
        }
    }

    /// The block height this event was emitted at.
    #[must_use]
    pub fn block_number(&self) -> BlockNumber {
        match self {
            Self::Created { block_number, .. }
            | Self::VoteCast { block_number, .. }
            | Self::Queued { block_number, .. }
            | Self::Executed { block_number, .. } => *block_number,
        }
    }
}
