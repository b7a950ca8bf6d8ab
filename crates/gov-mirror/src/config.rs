//! # Mirror Configuration

use serde::{Deserialize, Serialize};

/// Default bound on placeholder entries awaiting their creation event.
pub const DEFAULT_MAX_PLACEHOLDERS: usize = 1024;

/// Mirror configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Maximum placeholder proposals (referenced by id only) kept while
    /// waiting for the matching creation event or persisted record. The
    /// oldest placeholder is evicted when the bound is exceeded.
    pub max_placeholders: usize,

    /// Run a full reconciliation pass over every known proposal whenever a
    /// new block header is observed.
    pub resync_on_new_block: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            max_placeholders: DEFAULT_MAX_PLACEHOLDERS,
            resync_on_new_block: true,
        }
    }
}

impl MirrorConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            max_placeholders: 4,
            resync_on_new_block: true,
        }
    }
}
