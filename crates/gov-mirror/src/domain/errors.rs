//! # Domain Errors
//!
//! Error types for the reconciliation engine. None of these escape to
//! consumers: the service layer converts every failure into a log line and
//! keeps serving the last good snapshot.

use gov_types::{ChainId, RecordError};
use thiserror::Error;

/// Reconciliation engine error types.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// An authoritative read against the governor failed.
    /// The previous cached value stays in place; the next trigger retries.
    #[error("Authoritative query failed: {0}")]
    QueryFailed(String),

    /// The persistence gateway failed to load or append.
    #[error("Persistence gateway failed: {0}")]
    StoreFailed(String),

    /// A raw notification could not be normalized into a domain event.
    #[error("Malformed notification: {0}")]
    MalformedNotification(String),

    /// A persisted record violates the immutable-field shape invariant.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] RecordError),

    /// A record's id does not match the id recomputed from its fields.
    #[error("Record id mismatch: expected {expected}, got {got}")]
    RecordIdMismatch {
        /// Id recomputed from the immutable fields.
        expected: String,
        /// Id carried by the record.
        got: String,
    },

    /// A record belongs to a different chain than this registry.
    #[error("Chain mismatch: registry is for chain {expected}, record is for {got}")]
    ChainMismatch {
        /// Chain id the registry was created for.
        expected: ChainId,
        /// Chain id carried by the record.
        got: ChainId,
    },
}
