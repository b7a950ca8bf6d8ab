//! # Proposal Record
//!
//! The persisted/wire shape of a proposal's immutable fields. This is what
//! the persistence gateway stores and returns, keyed by chain id, and what
//! the submission path registers after sending a propose transaction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Address, ChainId, ProposalId, U256};
use crate::hex0x;

/// Validation failures for a [`ProposalRecord`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The action arrays are not the same length.
    #[error("action arrays misaligned: {targets} targets, {values} values, {calldatas} calldatas")]
    LengthMismatch {
        /// Number of target addresses.
        targets: usize,
        /// Number of call values.
        values: usize,
        /// Number of calldata payloads.
        calldatas: usize,
    },

    /// The record proposes no action at all.
    #[error("record has no actions")]
    Empty,
}

/// The immutable fields of a proposal, as persisted and exchanged.
///
/// Exactly these six fields; tallies and lifecycle state are runtime-only
/// and never persisted. Two records describing the same proposal are equal
/// on `id` by construction, whichever source produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    /// Canonical proposal id.
    #[serde(with = "hex0x::array")]
    pub id: ProposalId,
    /// Human-readable description text.
    pub description: String,
    /// Call target addresses, one per action.
    #[serde(with = "hex0x::array_vec")]
    pub targets: Vec<Address>,
    /// Native-token values, one per action.
    pub values: Vec<U256>,
    /// Encoded call payloads, one per action.
    #[serde(with = "hex0x::bytes_vec")]
    pub calldatas: Vec<Vec<u8>>,
    /// Chain this proposal lives on.
    pub chain_id: ChainId,
}

impl ProposalRecord {
    /// Check the immutable-field shape invariant.
    ///
    /// # Errors
    /// - [`RecordError::LengthMismatch`] if the action arrays differ in length
    /// - [`RecordError::Empty`] if the record carries no actions
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.targets.len() != self.values.len() || self.targets.len() != self.calldatas.len() {
            return Err(RecordError::LengthMismatch {
                targets: self.targets.len(),
                values: self.values.len(),
                calldatas: self.calldatas.len(),
            });
        }
        if self.targets.is_empty() {
            return Err(RecordError::Empty);
        }
        Ok(())
    }
}
