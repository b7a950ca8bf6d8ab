//! # Simulated Governor
//!
//! An in-memory governor plus chain: holds authoritative proposal state,
//! answers the read surface, and publishes the matching notifications to a
//! chain feed. Backs the integration tests and any demo wiring; a real
//! deployment puts an RPC client behind the same `GovernorReader` port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gov_feed::{ChainFeed, ChainNotification, FeedPublisher};
use gov_types::{Address, BlockNumber, ProposalId, U256};

use crate::algorithms::proposal_id::{hash_description, hash_proposal};
use crate::algorithms::tally_fold::fold_vote;
use crate::domain::entities::ProposalPayload;
use crate::domain::errors::MirrorError;
use crate::domain::value_objects::{GovernorParams, ProposalState, VoteSupport, VoteTally};
use crate::ports::outbound::GovernorReader;

/// In-memory governor simulation.
pub struct SimGovernor {
    /// Feed the simulated chain publishes to.
    feed: Arc<ChainFeed>,
    /// Current chain head.
    head: AtomicU64,
    /// Authoritative lifecycle states.
    states: Mutex<HashMap<ProposalId, ProposalState>>,
    /// Authoritative tallies.
    votes: Mutex<HashMap<ProposalId, VoteTally>>,
    /// Submitted payloads, for emitting plausible execution notifications.
    payloads: Mutex<HashMap<ProposalId, ProposalPayload>>,
    /// Governor parameters.
    params: GovernorParams,
}

impl SimGovernor {
    /// Create a simulation publishing to the given feed.
    #[must_use]
    pub fn new(feed: Arc<ChainFeed>) -> Self {
        Self {
            feed,
            head: AtomicU64::new(0),
            states: Mutex::new(HashMap::new()),
            votes: Mutex::new(HashMap::new()),
            payloads: Mutex::new(HashMap::new()),
            params: GovernorParams {
                voting_delay: 1,
                voting_period: 10,
                min_execution_delay: 3600,
            },
        }
    }

    /// Current head height.
    #[must_use]
    pub fn head(&self) -> BlockNumber {
        self.head.load(Ordering::Relaxed)
    }

    /// Mine one block and publish its header.
    pub async fn mine_block(&self) -> BlockNumber {
        let number = self.head.fetch_add(1, Ordering::Relaxed) + 1;
        self.feed
            .publish(ChainNotification::NewBlock { number })
            .await;
        number
    }

    /// Submit a proposal: record it as `Pending` with a zero tally and
    /// publish the creation notification at the current head.
    pub async fn submit_proposal(&self, proposer: Address, payload: ProposalPayload) -> ProposalId {
        let id = hash_proposal(
            &payload.targets,
            &payload.values,
            &payload.calldatas,
            &hash_description(&payload.description),
        );
        let block_number = self.head();

        if let Ok(mut states) = self.states.lock() {
            states.insert(id, ProposalState::Pending);
        }
        if let Ok(mut votes) = self.votes.lock() {
            votes.insert(id, VoteTally::zero());
        }
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.insert(id, payload.clone());
        }

        self.feed
            .publish(ChainNotification::ProposalCreated {
                proposal_id: id,
                proposer,
                targets: payload.targets,
                values: payload.values,
                signatures: Vec::new(),
                calldatas: payload.calldatas,
                start_block: block_number + self.params.voting_delay,
                end_block: block_number + self.params.voting_delay + self.params.voting_period,
                description: payload.description,
                block_number,
            })
            .await;
        id
    }

    /// Cast a vote: grow the authoritative tally and publish the
    /// notification at the current head.
    pub async fn cast_vote(
        &self,
        voter: Address,
        id: ProposalId,
        support: VoteSupport,
        weight: U256,
    ) {
        if let Ok(mut votes) = self.votes.lock() {
            let current = votes.get(&id).cloned().unwrap_or_else(VoteTally::zero);
            votes.insert(id, fold_vote(&current, support, weight));
        }

        self.feed
            .publish(ChainNotification::VoteCast {
                voter,
                proposal_id: id,
                support: support.to_wire(),
                weight,
                reason: String::new(),
                block_number: self.head(),
            })
            .await;
    }

    /// Queue a proposal and publish the notification.
    pub async fn queue_proposal(&self, id: ProposalId) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(id, ProposalState::Queued);
        }
        self.feed
            .publish(ChainNotification::ProposalQueued {
                proposal_id: id,
                eta: 1_700_000_000,
                block_number: self.head(),
            })
            .await;
    }

    /// Execute a proposal and publish the timelock notification.
    pub async fn execute_proposal(&self, id: ProposalId) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(id, ProposalState::Executed);
        }
        let (target, data) = self
            .payloads
            .lock()
            .ok()
            .and_then(|payloads| {
                payloads.get(&id).map(|p| {
                    (
                        p.targets.first().copied().unwrap_or([0u8; 20]),
                        p.calldatas.first().cloned().unwrap_or_default(),
                    )
                })
            })
            .unwrap_or(([0u8; 20], Vec::new()));

        self.feed
            .publish(ChainNotification::CallExecuted {
                proposal_id: id,
                index: U256::zero(),
                target,
                value: U256::zero(),
                data,
                block_number: self.head(),
            })
            .await;
    }

    /// Force an authoritative state, bypassing notifications. Stands in
    /// for on-chain transitions the mirror never observes as events
    /// (voting windows opening, quorum outcomes).
    pub fn force_state(&self, id: ProposalId, state: ProposalState) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(id, state);
        }
    }

    /// Force an authoritative tally, bypassing notifications. Stands in
    /// for weight rules the mirror does not simulate.
    pub fn force_votes(&self, id: ProposalId, tally: VoteTally) {
        if let Ok(mut votes) = self.votes.lock() {
            votes.insert(id, tally);
        }
    }
}

#[async_trait]
impl GovernorReader for SimGovernor {
    async fn block_number(&self) -> Result<BlockNumber, MirrorError> {
        Ok(self.head())
    }

    async fn proposal_state(&self, id: ProposalId) -> Result<ProposalState, MirrorError> {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(&id).copied())
            .ok_or_else(|| MirrorError::QueryFailed("unknown proposal".to_string()))
    }

    async fn proposal_votes(&self, id: ProposalId) -> Result<VoteTally, MirrorError> {
        self.votes
            .lock()
            .ok()
            .and_then(|votes| votes.get(&id).cloned())
            .ok_or_else(|| MirrorError::QueryFailed("unknown proposal".to_string()))
    }

    async fn voting_delay(&self) -> Result<u64, MirrorError> {
        Ok(self.params.voting_delay)
    }

    async fn voting_period(&self) -> Result<u64, MirrorError> {
        Ok(self.params.voting_period)
    }

    async fn min_execution_delay(&self) -> Result<u64, MirrorError> {
        Ok(self.params.min_execution_delay)
    }
}
