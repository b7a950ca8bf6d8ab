//! # Outbound Ports
//!
//! Traits for the external collaborators the mirror consumes: the
//! authoritative governor read surface and the persistence gateway.
//! Mock implementations for testing live alongside the traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gov_types::{to_hex0x, BlockNumber, ChainId, ProposalId, ProposalRecord};

use crate::domain::errors::MirrorError;
use crate::domain::value_objects::{GovernorParams, ProposalState, VoteTally};

/// Authoritative governor read surface - outbound port.
///
/// Every method is a request/response network round trip with no ordering
/// guarantee relative to the event feed. Results are trusted over any
/// locally folded value.
#[async_trait]
pub trait GovernorReader: Send + Sync {
    /// Current chain head height.
    async fn block_number(&self) -> Result<BlockNumber, MirrorError>;

    /// Current lifecycle state of a proposal.
    async fn proposal_state(&self, id: ProposalId) -> Result<ProposalState, MirrorError>;

    /// Current vote tally of a proposal.
    async fn proposal_votes(&self, id: ProposalId) -> Result<VoteTally, MirrorError>;

    /// Blocks between creation and voting start.
    async fn voting_delay(&self) -> Result<u64, MirrorError>;

    /// Voting window length in blocks.
    async fn voting_period(&self) -> Result<u64, MirrorError>;

    /// Minimum timelock delay before execution, in seconds.
    async fn min_execution_delay(&self) -> Result<u64, MirrorError>;
}

/// Persistence gateway - outbound port.
///
/// Eventually consistent with the event feed: a proposal may be visible
/// via events before its `append` lands, or the other way round. The
/// registry treats both orders as equivalent.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Load all persisted records for a chain.
    async fn load(&self, chain_id: ChainId) -> Result<Vec<ProposalRecord>, MirrorError>;

    /// Append one record for a chain.
    async fn append(&self, chain_id: ChainId, record: &ProposalRecord) -> Result<(), MirrorError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock governor for testing: programmable answers and a failure switch.
#[derive(Default)]
pub struct MockGovernor {
    /// Simulated chain head.
    head: AtomicU64,
    /// Per-proposal lifecycle states.
    states: Mutex<HashMap<ProposalId, ProposalState>>,
    /// Per-proposal tallies.
    votes: Mutex<HashMap<ProposalId, VoteTally>>,
    /// Governor parameters.
    params: Mutex<GovernorParams>,
    /// Should all queries fail?
    fail_queries: AtomicBool,
    /// Total queries attempted (failures included).
    query_count: AtomicU64,
}

impl MockGovernor {
    /// Create a mock with zeroed answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated chain head.
    pub fn set_head(&self, height: BlockNumber) {
        self.head.store(height, Ordering::Relaxed);
    }

    /// Program the state answer for a proposal.
    pub fn set_state(&self, id: ProposalId, state: ProposalState) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(id, state);
        }
    }

    /// Program the tally answer for a proposal.
    pub fn set_votes(&self, id: ProposalId, tally: VoteTally) {
        if let Ok(mut votes) = self.votes.lock() {
            votes.insert(id, tally);
        }
    }

    /// Program the governor parameters.
    pub fn set_params(&self, params: GovernorParams) {
        if let Ok(mut current) = self.params.lock() {
            *current = params;
        }
    }

    /// Flip the failure switch for all queries.
    pub fn set_fail(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::Relaxed);
    }

    /// Total queries attempted so far.
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), MirrorError> {
        self.query_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_queries.load(Ordering::Relaxed) {
            return Err(MirrorError::QueryFailed("mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GovernorReader for MockGovernor {
    async fn block_number(&self) -> Result<BlockNumber, MirrorError> {
        self.check()?;
        Ok(self.head.load(Ordering::Relaxed))
    }

    async fn proposal_state(&self, id: ProposalId) -> Result<ProposalState, MirrorError> {
        self.check()?;
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(&id).copied())
            .ok_or_else(|| {
                MirrorError::QueryFailed(format!("unknown proposal {}", to_hex0x(&id)))
            })
    }

    async fn proposal_votes(&self, id: ProposalId) -> Result<VoteTally, MirrorError> {
        self.check()?;
        self.votes
            .lock()
            .ok()
            .and_then(|votes| votes.get(&id).cloned())
            .ok_or_else(|| {
                MirrorError::QueryFailed(format!("unknown proposal {}", to_hex0x(&id)))
            })
    }

    async fn voting_delay(&self) -> Result<u64, MirrorError> {
        self.check()?;
        Ok(self.params.lock().map(|p| p.voting_delay).unwrap_or(0))
    }

    async fn voting_period(&self) -> Result<u64, MirrorError> {
        self.check()?;
        Ok(self.params.lock().map(|p| p.voting_period).unwrap_or(0))
    }

    async fn min_execution_delay(&self) -> Result<u64, MirrorError> {
        self.check()?;
        Ok(self
            .params
            .lock()
            .map(|p| p.min_execution_delay)
            .unwrap_or(0))
    }
}

/// Mock persistence gateway for testing.
#[derive(Default)]
pub struct MockStore {
    /// Records keyed by chain id.
    records: Mutex<HashMap<ChainId, Vec<ProposalRecord>>>,
    /// Should all calls fail?
    fail: AtomicBool,
}

impl MockStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock store pre-seeded with records for one chain.
    #[must_use]
    pub fn with_records(chain_id: ChainId, records: Vec<ProposalRecord>) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.records.lock() {
            map.insert(chain_id, records);
        }
        store
    }

    /// Flip the failure switch.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Number of records held for a chain.
    #[must_use]
    pub fn record_count(&self, chain_id: ChainId) -> usize {
        self.records
            .lock()
            .ok()
            .and_then(|map| map.get(&chain_id).map(Vec::len))
            .unwrap_or(0)
    }

    fn check(&self) -> Result<(), MirrorError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(MirrorError::StoreFailed("mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProposalStore for MockStore {
    async fn load(&self, chain_id: ChainId) -> Result<Vec<ProposalRecord>, MirrorError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .ok()
            .and_then(|map| map.get(&chain_id).cloned())
            .unwrap_or_default())
    }

    async fn append(&self, chain_id: ChainId, record: &ProposalRecord) -> Result<(), MirrorError> {
        self.check()?;
        if let Ok(mut map) = self.records.lock() {
            map.entry(chain_id).or_default().push(record.clone());
        }
        Ok(())
    }
}
