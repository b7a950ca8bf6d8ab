//! # Shared Test Fixtures
//!
//! Payloads, records, and raw notifications used across the integration
//! scenarios. Ids are always computed, never invented, so fixtures merge
//! across sources exactly like production data.

use gov_feed::ChainNotification;
use gov_mirror::{hash_description, hash_proposal, ProposalPayload};
use gov_types::{ChainId, ProposalId, ProposalRecord, U256};

/// Chain id used by every scenario unless stated otherwise.
pub const CHAIN: ChainId = 31337;

/// A one-action payload whose identity is the description text.
pub fn payload(description: &str) -> ProposalPayload {
    ProposalPayload {
        description: description.to_string(),
        targets: vec![[0x11; 20]],
        values: vec![U256::zero()],
        calldatas: vec![vec![0xde, 0xad, 0xbe, 0xef]],
    }
}

/// Canonical id of a payload.
pub fn payload_id(payload: &ProposalPayload) -> ProposalId {
    hash_proposal(
        &payload.targets,
        &payload.values,
        &payload.calldatas,
        &hash_description(&payload.description),
    )
}

/// A persisted record matching `payload(description)`.
pub fn record(description: &str, chain_id: ChainId) -> ProposalRecord {
    let payload = payload(description);
    ProposalRecord {
        id: payload_id(&payload),
        description: payload.description,
        targets: payload.targets,
        values: payload.values,
        calldatas: payload.calldatas,
        chain_id,
    }
}

/// A raw creation notification matching `payload(description)`.
pub fn created_notification(description: &str, block_number: u64) -> ChainNotification {
    let payload = payload(description);
    ChainNotification::ProposalCreated {
        proposal_id: payload_id(&payload),
        proposer: [0x01; 20],
        targets: payload.targets,
        values: payload.values,
        signatures: Vec::new(),
        calldatas: payload.calldatas,
        start_block: block_number + 1,
        end_block: block_number + 11,
        description: payload.description,
        block_number,
    }
}

/// A raw vote notification.
pub fn vote_notification(
    proposal_id: ProposalId,
    support: u8,
    weight: u64,
    block_number: u64,
) -> ChainNotification {
    ChainNotification::VoteCast {
        voter: [0x02; 20],
        proposal_id,
        support,
        weight: U256::from(weight),
        reason: String::new(),
        block_number,
    }
}

/// Install a tracing subscriber once, so failing scenarios show the
/// engine's own log lines.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
