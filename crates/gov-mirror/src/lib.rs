//! # Gov Mirror
//!
//! Proposal state reconciliation engine for a governance voting client.
//!
//! ## Purpose
//!
//! Keep a locally-cached, continuously-updated view of on-chain proposals,
//! their vote tallies, and their lifecycle state, where the sources are:
//! - an append-only, possibly-delayed notification feed, and
//! - an authoritative but expensive contract read surface.
//!
//! ## How it stays correct
//!
//! | Hazard | Defense |
//! |--------|---------|
//! | Historical replay on (re-)subscription | Block-height watermark filter |
//! | Out-of-order callback completion | Commutative, idempotent fold reducers |
//! | Local folds drifting from chain truth | Authoritative reads overwrite unconditionally |
//! | Results racing a chain/account switch | Session token checked at apply time |
//!
//! ## Module Structure
//!
//! ```text
//! gov-mirror/
//! ├── domain/          # Proposal, tallies, lifecycle states, watermark, registry
//! ├── algorithms/      # Id hashing, tally folding, notification normalization
//! ├── ports/           # Read API (inbound) + governor/store traits (outbound)
//! ├── application/     # MirrorService orchestrating one chain session
//! ├── adapters/        # Flat-file store, simulated governor
//! └── config.rs        # MirrorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FileStore, SimGovernor};
pub use algorithms::{
    fold_vote, fold_votes, hash_description, hash_proposal, keccak256, normalize,
    NormalizedNotification,
};
pub use application::{MirrorService, SessionToken};
pub use config::MirrorConfig;
pub use domain::{
    invariant_actions_aligned, invariant_tally_monotonic, GovernorEvent, GovernorParams,
    MergeStats, MirrorError, Proposal, ProposalPayload, ProposalRegistry, ProposalState,
    VoteSupport, VoteTally, Watermark,
};
pub use ports::{GovernorReader, MirrorApi, MockGovernor, MockStore, ProposalStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
