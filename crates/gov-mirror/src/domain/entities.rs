//! # Domain Entities
//!
//! The proposal as the registry tracks it, and the immutable payload that
//! content-addresses it.

use gov_types::{Address, BlockNumber, ChainId, ProposalId, ProposalRecord, U256};
use serde::{Deserialize, Serialize};

use super::errors::MirrorError;
use super::invariants::invariant_actions_aligned;
use super::value_objects::{ProposalState, VoteTally};

/// The immutable payload of a proposal.
///
/// The canonical id is the keccak-256 of exactly these fields, so any two
/// parties that independently observe the same payload agree on the id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalPayload {
    /// Human-readable description text.
    pub description: String,
    /// Call target addresses, one per action.
    pub targets: Vec<Address>,
    /// Native-token values, one per action.
    pub values: Vec<U256>,
    /// Encoded call payloads, one per action.
    pub calldatas: Vec<Vec<u8>>,
}

impl ProposalPayload {
    /// Check the immutable-field shape invariant.
    ///
    /// # Errors
    /// - [`MirrorError::InvalidRecord`] if the action arrays are misaligned
    ///   or empty
    pub fn validate(&self) -> Result<(), MirrorError> {
        invariant_actions_aligned(&self.targets, &self.values, &self.calldatas)
    }

    /// Extract the payload from a persisted record.
    #[must_use]
    pub fn from_record(record: &ProposalRecord) -> Self {
        Self {
            description: record.description.clone(),
            targets: record.targets.clone(),
            values: record.values.clone(),
            calldatas: record.calldatas.clone(),
        }
    }
}

/// A proposal as the registry tracks it.
///
/// Every optional field starts unknown and fills in as events, persisted
/// records, and authoritative reads arrive, in any order. An entry whose
/// `payload` is still `None` is a *placeholder*: some event referenced the
/// id before the creation event or record was seen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    /// Canonical id, never mutated after creation.
    pub id: ProposalId,
    /// Chain this proposal lives on.
    pub chain_id: ChainId,
    /// Immutable payload; `None` while only referenced by id.
    pub payload: Option<ProposalPayload>,
    /// Account that submitted the proposal, when observed via an event.
    pub proposer: Option<Address>,
    /// Block of the creation event, set on first observation.
    pub created_at_block: Option<BlockNumber>,
    /// Last authoritative lifecycle state; `None` means not yet resolved.
    pub state: Option<ProposalState>,
    /// Current tally; locally folded until the next authoritative read.
    pub tally: Option<VoteTally>,
}

impl Proposal {
    /// Create a placeholder entry for an id seen before its creation event.
    #[must_use]
    pub fn placeholder(id: ProposalId, chain_id: ChainId) -> Self {
        Self {
            id,
            chain_id,
            payload: None,
            proposer: None,
            created_at_block: None,
            state: None,
            tally: None,
        }
    }

    /// Whether this entry is still awaiting its immutable payload.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.payload.is_none()
    }
}
