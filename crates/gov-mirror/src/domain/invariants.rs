//! # Domain Invariants
//!
//! Business rules that must always hold true.

use gov_types::{Address, RecordError, U256};

use super::errors::MirrorError;
use super::value_objects::VoteTally;

/// Invariant: a proposal's action arrays line up one-to-one.
///
/// `targets`, `values` and `calldatas` describe the same action list, so
/// their lengths must match and at least one action must exist.
pub fn invariant_actions_aligned(
    targets: &[Address],
    values: &[U256],
    calldatas: &[Vec<u8>],
) -> Result<(), MirrorError> {
    if targets.len() != values.len() || targets.len() != calldatas.len() {
        return Err(MirrorError::InvalidRecord(RecordError::LengthMismatch {
            targets: targets.len(),
            values: values.len(),
            calldatas: calldatas.len(),
        }));
    }
    if targets.is_empty() {
        return Err(MirrorError::InvalidRecord(RecordError::Empty));
    }
    Ok(())
}

/// Invariant: tally magnitudes never decrease between two local folds.
///
/// Votes are not retracted on-chain, so between authoritative reads every
/// magnitude is non-decreasing. An authoritative read may still replace the
/// whole tally in either direction; this check applies to folds only.
#[must_use]
pub fn invariant_tally_monotonic(prev: &VoteTally, next: &VoteTally) -> bool {
    next.against >= prev.against && next.for_votes >= prev.for_votes && next.abstain >= prev.abstain
}
