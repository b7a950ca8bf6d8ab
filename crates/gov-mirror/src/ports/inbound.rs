//! # Inbound Ports
//!
//! What consumers of the mirror can ask for. Everything is a cheap read
//! against the last merged snapshot; nothing here can fail or block.

use gov_types::{BlockNumber, ChainId, ProposalId};

use crate::domain::entities::Proposal;
use crate::domain::value_objects::GovernorParams;

/// Read-only view of the mirror - inbound port.
pub trait MirrorApi: Send + Sync {
    /// Immutable snapshot of all tracked proposals, oldest first.
    fn snapshot(&self) -> Vec<Proposal>;

    /// Look up one proposal by id.
    fn proposal(&self, id: &ProposalId) -> Option<Proposal>;

    /// The current watermark boundary, if one has been observed.
    fn watermark(&self) -> Option<BlockNumber>;

    /// Chain this mirror session is bound to.
    fn chain_id(&self) -> ChainId;

    /// Governor-wide parameters, once the bootstrap reads succeed.
    fn governor_params(&self) -> Option<GovernorParams>;

    /// Whether live events are being accepted (watermark is set).
    fn is_live(&self) -> bool;
}
