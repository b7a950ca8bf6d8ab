//! # Application Layer
//!
//! The mirror service orchestrating the engine.

pub mod service;

pub use service::{MirrorService, SessionToken};
