//! # Proposal Registry
//!
//! The authoritative in-memory mapping of proposal id to proposal record
//! for one chain. Sole writer of proposal state; everything a consumer
//! sees comes out of `snapshot()`.
//!
//! Merge policy in one line: immutable fields are first-writer-wins,
//! folded tallies only ever grow, authoritative reads overwrite
//! unconditionally.

use std::collections::HashMap;

use gov_types::{to_hex0x, ChainId, ProposalId, ProposalRecord};
use tracing::{debug, warn};

use crate::algorithms::proposal_id::{hash_description, hash_proposal};
use crate::algorithms::tally_fold::fold_vote;

use super::entities::{Proposal, ProposalPayload};
use super::errors::MirrorError;
use super::events::GovernorEvent;
use super::value_objects::{ProposalState, VoteTally};

/// Outcome counters for a bulk record merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records merged (or confirmed already present).
    pub merged: usize,
    /// Records rejected individually.
    pub skipped: usize,
}

/// Authoritative in-memory proposal registry for one chain id.
#[derive(Debug)]
pub struct ProposalRegistry {
    /// Chain this registry mirrors.
    chain_id: ChainId,
    /// Proposals indexed by id.
    proposals: HashMap<ProposalId, Proposal>,
    /// Ids in first-observation order, for stable snapshots.
    order: Vec<ProposalId>,
    /// Bound on entries that are still placeholders.
    max_placeholders: usize,
    /// Current number of placeholder entries.
    placeholder_count: usize,
}

impl ProposalRegistry {
    /// Create an empty registry for a chain.
    #[must_use]
    pub fn new(chain_id: ChainId, max_placeholders: usize) -> Self {
        Self {
            chain_id,
            proposals: HashMap::new(),
            order: Vec::new(),
            max_placeholders,
            placeholder_count: 0,
        }
    }

    /// Chain this registry was created for.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Number of tracked proposals (placeholders included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Number of entries still awaiting their immutable payload.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Look up a proposal by id.
    #[must_use]
    pub fn get(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// All tracked ids in first-observation order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProposalId> {
        self.order.clone()
    }

    /// Fold a normalized event into the registry.
    ///
    /// `Created` fills the immutable fields if absent (first writer wins; a
    /// repeat is a no-op beyond confirming presence). `VoteCast` folds the
    /// weight into the local tally. `Queued`/`Executed` only confirm
    /// presence: the resulting lifecycle state is never inferred locally.
    ///
    /// Returns the id of the affected proposal so the caller can schedule
    /// an authoritative resync for it.
    pub fn apply_event(&mut self, event: &GovernorEvent) -> ProposalId {
        let id = event.proposal_id();
        self.ensure_entry(id);

        match event {
            GovernorEvent::Created {
                proposer,
                payload,
                block_number,
                ..
            } => {
                if let Some(entry) = self.proposals.get_mut(&id) {
                    if entry.payload.is_none() {
                        entry.payload = Some(payload.clone());
                        self.placeholder_count = self.placeholder_count.saturating_sub(1);
                    }
                    if entry.proposer.is_none() {
                        entry.proposer = Some(*proposer);
                    }
                    if entry.created_at_block.is_none() {
                        entry.created_at_block = Some(*block_number);
                    }
                }
            }
            GovernorEvent::VoteCast {
                support, weight, ..
            } => {
                if let Some(entry) = self.proposals.get_mut(&id) {
                    let current = entry.tally.clone().unwrap_or_else(VoteTally::zero);
                    entry.tally = Some(fold_vote(&current, *support, *weight));
                }
            }
            GovernorEvent::Queued { .. } | GovernorEvent::Executed { .. } => {
                // Presence confirmed above; the lifecycle enum comes only
                // from the next authoritative read.
            }
        }

        id
    }

    /// Merge one persisted record.
    ///
    /// Supplies the immutable fields for unseen ids and fills placeholders;
    /// never overwrites a locally-observed tally or lifecycle state.
    ///
    /// # Errors
    /// - [`MirrorError::InvalidRecord`] on a shape violation
    /// - [`MirrorError::ChainMismatch`] for a record from another chain
    /// - [`MirrorError::RecordIdMismatch`] when the carried id does not
    ///   match the id recomputed from the fields
    pub fn merge_record(&mut self, record: ProposalRecord) -> Result<(), MirrorError> {
        record.validate()?;

        if record.chain_id != self.chain_id {
            return Err(MirrorError::ChainMismatch {
                expected: self.chain_id,
                got: record.chain_id,
            });
        }

        let expected = hash_proposal(
            &record.targets,
            &record.values,
            &record.calldatas,
            &hash_description(&record.description),
        );
        if expected != record.id {
            return Err(MirrorError::RecordIdMismatch {
                expected: to_hex0x(&expected),
                got: to_hex0x(&record.id),
            });
        }

        self.ensure_entry(record.id);
        if let Some(entry) = self.proposals.get_mut(&record.id) {
            if entry.payload.is_none() {
                entry.payload = Some(ProposalPayload::from_record(&record));
                self.placeholder_count = self.placeholder_count.saturating_sub(1);
            }
        }
        Ok(())
    }

    /// Bulk-merge persisted records. Rejected records are counted and
    /// logged; they never abort the rest of the batch.
    pub fn merge_records(&mut self, records: Vec<ProposalRecord>) -> MergeStats {
        let mut stats = MergeStats::default();
        for record in records {
            let id = to_hex0x(&record.id);
            match self.merge_record(record) {
                Ok(()) => stats.merged += 1,
                Err(e) => {
                    warn!(record = %id, error = %e, "Skipping persisted record");
                    stats.skipped += 1;
                }
            }
        }
        stats
    }

    /// Overwrite a proposal's tally with an authoritative read.
    ///
    /// Returns false when the id is unknown (nothing to overwrite).
    pub fn apply_votes(&mut self, id: &ProposalId, tally: VoteTally) -> bool {
        match self.proposals.get_mut(id) {
            Some(entry) => {
                entry.tally = Some(tally);
                true
            }
            None => false,
        }
    }

    /// Overwrite a proposal's lifecycle state with an authoritative read.
    ///
    /// Returns false when the id is unknown.
    pub fn apply_state(&mut self, id: &ProposalId, state: ProposalState) -> bool {
        match self.proposals.get_mut(id) {
            Some(entry) => {
                entry.state = Some(state);
                true
            }
            None => false,
        }
    }

    /// An immutable, consistent view of all tracked proposals in
    /// first-observation order. Each record is cloned whole, so a reader
    /// never sees a partially-updated entry.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Proposal> {
        self.order
            .iter()
            .filter_map(|id| self.proposals.get(id))
            .cloned()
            .collect()
    }

    /// Insert a placeholder for an unseen id, evicting the oldest
    /// placeholder when the bound is exceeded.
    fn ensure_entry(&mut self, id: ProposalId) {
        if self.proposals.contains_key(&id) {
            return;
        }
        if self.placeholder_count >= self.max_placeholders {
            self.evict_oldest_placeholder();
        }
        self.proposals
            .insert(id, Proposal::placeholder(id, self.chain_id));
        self.order.push(id);
        self.placeholder_count += 1;
        debug!(proposal = %to_hex0x(&id), "Tracking new proposal");
    }

    fn evict_oldest_placeholder(&mut self) {
        let oldest = self.order.iter().position(|id| {
            self.proposals
                .get(id)
                .map_or(false, Proposal::is_placeholder)
        });
        if let Some(pos) = oldest {
            let id = self.order.remove(pos);
            self.proposals.remove(&id);
            self.placeholder_count = self.placeholder_count.saturating_sub(1);
            warn!(proposal = %to_hex0x(&id), "Placeholder bound exceeded, evicting oldest");
        }
    }
}
