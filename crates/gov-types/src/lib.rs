//! # Gov Types Crate
//!
//! Shared primitives for the governor mirror: chain-level type aliases,
//! `0x`-prefixed hex serde helpers, and the `ProposalRecord` wire type
//! exchanged with the persistence gateway.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   (feed, mirror, persistence) is defined here.
//! - **Wire-shape fidelity**: records serialize to the same JSON shape the
//!   persistence file stores (`0x`-prefixed hex, decimal chain ids).

pub mod entities;
pub mod hex0x;
pub mod record;

pub use entities::*;
pub use record::{ProposalRecord, RecordError};
