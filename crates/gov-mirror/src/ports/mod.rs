//! # Ports
//!
//! Inbound (what the mirror offers) and outbound (what it consumes).

pub mod inbound;
pub mod outbound;

pub use inbound::MirrorApi;
pub use outbound::{GovernorReader, MockGovernor, MockStore, ProposalStore};
