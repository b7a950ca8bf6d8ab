//! # Chain Notifications
//!
//! Raw notification variants as the chain delivers them, before any
//! normalization. Field layouts mirror the governor and timelock event
//! signatures; every variant carries the block height it was emitted at.

use gov_types::{Address, BlockNumber, ProposalId, U256};
use serde::{Deserialize, Serialize};

/// A raw notification from the chain.
///
/// These are transport-level payloads: the feed does not validate them, and
/// duplicates or replays are possible on (re-)subscription. Normalization
/// and replay filtering are the consumer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainNotification {
    /// A proposal was created on the governor.
    ProposalCreated {
        /// Proposal id as emitted on the wire.
        proposal_id: ProposalId,
        /// Account that submitted the proposal.
        proposer: Address,
        /// Call target addresses, one per action.
        targets: Vec<Address>,
        /// Native-token values, one per action.
        values: Vec<U256>,
        /// Function signatures (legacy field, unused by consumers here).
        signatures: Vec<String>,
        /// Encoded call payloads, one per action.
        calldatas: Vec<Vec<u8>>,
        /// First block of the voting window.
        start_block: BlockNumber,
        /// Last block of the voting window.
        end_block: BlockNumber,
        /// Human-readable description text.
        description: String,
        /// Block this notification was emitted at.
        block_number: BlockNumber,
    },

    /// A vote was cast on a proposal.
    VoteCast {
        /// Voting account.
        voter: Address,
        /// Proposal voted on.
        proposal_id: ProposalId,
        /// Support byte: 0 = against, 1 = for, 2 = abstain.
        support: u8,
        /// Voting weight applied.
        weight: U256,
        /// Free-form vote reason (unused by consumers here).
        reason: String,
        /// Block this notification was emitted at.
        block_number: BlockNumber,
    },

    /// A proposal was queued on the timelock.
    ProposalQueued {
        /// Proposal that was queued.
        proposal_id: ProposalId,
        /// Earliest execution timestamp.
        eta: u64,
        /// Block this notification was emitted at.
        block_number: BlockNumber,
    },

    /// A queued call was executed by the timelock.
    CallExecuted {
        /// Proposal whose call was executed.
        proposal_id: ProposalId,
        /// Index of the call within the batch.
        index: U256,
        /// Call target.
        target: Address,
        /// Native-token value sent.
        value: U256,
        /// Call payload.
        data: Vec<u8>,
        /// Block this notification was emitted at.
        block_number: BlockNumber,
    },

    /// A new block header was observed.
    NewBlock {
        /// Height of the new head.
        number: BlockNumber,
    },
}

impl ChainNotification {
    /// Get the topic for this notification (for filtering).
    #[must_use]
    pub fn topic(&self) -> NotificationTopic {
        match self {
            Self::ProposalCreated { .. } | Self::VoteCast { .. } | Self::ProposalQueued { .. } => {
                NotificationTopic::Governor
            }
            Self::CallExecuted { .. } => NotificationTopic::Timelock,
            Self::NewBlock { .. } => NotificationTopic::Blocks,
        }
    }

    /// Get the block height this notification was emitted at.
    #[must_use]
    pub fn block_number(&self) -> BlockNumber {
        match self {
            Self::ProposalCreated { block_number, .. }
            | Self::VoteCast { block_number, .. }
            | Self::ProposalQueued { block_number, .. }
            | Self::CallExecuted { block_number, .. } => *block_number,
            Self::NewBlock { number } => *number,
        }
    }

    /// Get the proposal this notification refers to, if any.
    #[must_use]
    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            Self::ProposalCreated { proposal_id, .. }
            | Self::VoteCast { proposal_id, .. }
            | Self::ProposalQueued { proposal_id, .. }
            | Self::CallExecuted { proposal_id, .. } => Some(*proposal_id),
            Self::NewBlock { .. } => None,
        }
    }
}

/// Notification topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationTopic {
    /// Governor contract events.
    Governor,
    /// Timelock contract events.
    Timelock,
    /// New block headers.
    Blocks,
    /// All notifications (no filtering).
    All,
}

/// Filter for subscribing to specific notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<NotificationTopic>,
    /// Proposal ids to include. Empty means all proposals.
    /// Block headers always pass this dimension.
    pub proposal_ids: Vec<ProposalId>,
}

impl NotificationFilter {
    /// Create a filter that accepts all notifications.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<NotificationTopic>) -> Self {
        Self {
            topics,
            proposal_ids: Vec::new(),
        }
    }

    /// Create a filter for notifications about specific proposals.
    #[must_use]
    pub fn proposals(proposal_ids: Vec<ProposalId>) -> Self {
        Self {
            topics: Vec::new(),
            proposal_ids,
        }
    }

    /// Check if a notification matches this filter.
    #[must_use]
    pub fn matches(&self, notification: &ChainNotification) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&NotificationTopic::All)
            || self.topics.contains(&notification.topic());

        let proposal_match = self.proposal_ids.is_empty()
            || match notification.proposal_id() {
                Some(id) => self.proposal_ids.contains(&id),
                None => true,
            };

        topic_match && proposal_match
    }
}
