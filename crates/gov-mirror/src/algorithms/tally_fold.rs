//! # Vote Tally Reducer
//!
//! Pure fold of a vote into a tally. Commutative and associative over the
//! multiset of votes for one proposal, so the registry converges to the
//! same tally whatever order the network delivers the callbacks in. The
//! folded value is advisory between authoritative reads; the next read
//! replaces it wholesale.

use gov_types::U256;

use crate::domain::value_objects::{VoteSupport, VoteTally};

/// Fold one vote into a tally: the chosen direction grows by `weight`,
/// the other two magnitudes are untouched.
#[must_use]
pub fn fold_vote(tally: &VoteTally, support: VoteSupport, weight: U256) -> VoteTally {
    let mut next = tally.clone();
    match support {
        VoteSupport::Against => next.against = next.against.saturating_add(weight),
        VoteSupport::For => next.for_votes = next.for_votes.saturating_add(weight),
        VoteSupport::Abstain => next.abstain = next.abstain.saturating_add(weight),
    }
    next
}

/// Fold a sequence of votes, in order.
#[must_use]
pub fn fold_votes(tally: &VoteTally, votes: &[(VoteSupport, U256)]) -> VoteTally {
    votes
        .iter()
        .fold(tally.clone(), |acc, (support, weight)| {
            fold_vote(&acc, *support, *weight)
        })
}
