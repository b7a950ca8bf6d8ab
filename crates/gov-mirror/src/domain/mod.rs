//! # Domain Layer
//!
//! Core entities, value objects, events, invariants, and the proposal
//! registry.

pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod registry;
pub mod value_objects;

pub use entities::{Proposal, ProposalPayload};
pub use errors::MirrorError;
pub use events::GovernorEvent;
pub use invariants::{invariant_actions_aligned, invariant_tally_monotonic};
pub use registry::{MergeStats, ProposalRegistry};
pub use value_objects::{GovernorParams, ProposalState, VoteSupport, VoteTally, Watermark};
