//! # Algorithms
//!
//! Pure logic: id computation, tally folding, notification normalization.

pub mod normalize;
pub mod proposal_id;
pub mod tally_fold;

pub use normalize::{normalize, NormalizedNotification};
pub use proposal_id::{hash_description, hash_proposal, keccak256};
pub use tally_fold::{fold_vote, fold_votes};
