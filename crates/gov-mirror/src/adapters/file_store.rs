//! # Flat-File Proposal Store
//!
//! Reference persistence gateway: one JSON file holding a map from chain
//! id (as a decimal string) to an array of records. Appends are
//! read-modify-write; a missing file or unknown chain id is just an empty
//! result. Individual malformed entries are skipped on load; the batch
//! continues.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gov_types::{ChainId, ProposalRecord};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::errors::MirrorError;
use crate::ports::outbound::ProposalStore;

/// Flat-file JSON store.
pub struct FileStore {
    /// Path of the proposals file.
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file as a chain-id keyed JSON object. A missing file
    /// is an empty object; anything unreadable or non-object is an error.
    async fn read_map(&self) -> Result<Map<String, Value>, MirrorError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(MirrorError::StoreFailed(e.to_string())),
        };

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| MirrorError::StoreFailed(format!("unparseable store file: {e}")))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(MirrorError::StoreFailed(format!(
                "store file is not an object: {other}"
            ))),
        }
    }
}

#[async_trait]
impl ProposalStore for FileStore {
    async fn load(&self, chain_id: ChainId) -> Result<Vec<ProposalRecord>, MirrorError> {
        let map = self.read_map().await?;

        let Some(Value::Array(entries)) = map.get(&chain_id.to_string()) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<ProposalRecord>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(e) => warn!(chain_id, error = %e, "Skipping unparseable persisted entry"),
            }
        }
        Ok(records)
    }

    async fn append(&self, chain_id: ChainId, record: &ProposalRecord) -> Result<(), MirrorError> {
        let mut map = self.read_map().await?;

        let value = serde_json::to_value(record)
            .map_err(|e| MirrorError::StoreFailed(e.to_string()))?;
        match map
            .entry(chain_id.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(entries) => entries.push(value),
            other => {
                return Err(MirrorError::StoreFailed(format!(
                    "chain entry is not an array: {other}"
                )))
            }
        }

        let bytes = serde_json::to_vec(&Value::Object(map))
            .map_err(|e| MirrorError::StoreFailed(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| MirrorError::StoreFailed(e.to_string()))
    }
}
