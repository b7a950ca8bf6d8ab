//! # Event Normalizer
//!
//! Translates raw feed notifications into the closed domain event set.
//! All payload validation happens here, once: downstream code matches on
//! `GovernorEvent` and never inspects raw shapes again. No registry
//! mutation happens at this boundary.

use gov_feed::ChainNotification;
use gov_types::{to_hex0x, BlockNumber};

use crate::domain::entities::ProposalPayload;
use crate::domain::errors::MirrorError;
use crate::domain::events::GovernorEvent;
use crate::domain::invariants::invariant_actions_aligned;
use crate::domain::value_objects::VoteSupport;

use super::proposal_id::{hash_description, hash_proposal};

/// A successfully normalized notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizedNotification {
    /// A domain event to fold into the registry.
    Event(GovernorEvent),
    /// A new chain head observation.
    NewHead(BlockNumber),
}

/// Normalize one raw notification.
///
/// `ProposalCreated` recomputes the id from the immutable fields; a wire
/// id that disagrees marks the notification malformed rather than seeding
/// the registry under a key other sources would never produce.
///
/// # Errors
/// - [`MirrorError::MalformedNotification`] for misaligned action arrays,
///   an out-of-range support byte, or a wire/computed id mismatch
/// - [`MirrorError::InvalidRecord`] via the shape invariant
pub fn normalize(notification: ChainNotification) -> Result<NormalizedNotification, MirrorError> {
    match notification {
        ChainNotification::ProposalCreated {
            proposal_id,
            proposer,
            targets,
            values,
            calldatas,
            description,
            block_number,
            ..
        } => {
            invariant_actions_aligned(&targets, &values, &calldatas)?;

            let id = hash_proposal(
                &targets,
                &values,
                &calldatas,
                &hash_description(&description),
            );
            if id != proposal_id {
                return Err(MirrorError::MalformedNotification(format!(
                    "creation id {} does not match fields (computed {})",
                    to_hex0x(&proposal_id),
                    to_hex0x(&id)
                )));
            }

            Ok(NormalizedNotification::Event(GovernorEvent::Created {
                id,
                proposer,
                payload: ProposalPayload {
                    description,
                    targets,
                    values,
                    calldatas,
                },
                block_number,
            }))
        }

        ChainNotification::VoteCast {
            proposal_id,
            support,
            weight,
            block_number,
            ..
        } => {
            let support = VoteSupport::from_wire(support).ok_or_else(|| {
                MirrorError::MalformedNotification(format!("support byte out of range: {support}"))
            })?;
            Ok(NormalizedNotification::Event(GovernorEvent::VoteCast {
                proposal_id,
                support,
                weight,
                block_number,
            }))
        }

        ChainNotification::ProposalQueued {
            proposal_id,
            block_number,
            ..
        } => Ok(NormalizedNotification::Event(GovernorEvent::Queued {
            proposal_id,
            block_number,
        })),

        ChainNotification::CallExecuted {
            proposal_id,
            block_number,
            ..
        } => Ok(NormalizedNotification::Event(GovernorEvent::Executed {
            proposal_id,
            block_number,
        })),

        ChainNotification::NewBlock { number } => Ok(NormalizedNotification::NewHead(number)),
    }
}
