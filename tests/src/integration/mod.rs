//! # Integration Scenarios
//!
//! Cross-crate tests driving the mirror through the feed, the ports, and
//! the adapters together.

pub mod convergence;
pub mod dual_source;
pub mod fixtures;
pub mod pipeline;
pub mod replay;
pub mod session;
