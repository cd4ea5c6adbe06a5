//! File-backed node id store.
//!
//! The record is a small JSON document. Writes go to a private temp file
//! which is then hard-linked to the record path; the link fails if the
//! record already exists, so concurrent bootstrappers against the same
//! directory see exactly one winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nodeid_core::{NodeIdStore, StoreError};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// On-disk shape of the persisted identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdRecord {
    /// Committed identity
    pub node_id: String,
    /// When the record was committed
    pub created_at: DateTime<Utc>,
}

/// Node id store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileNodeIdStore {
    path: PathBuf,
}

impl FileNodeIdStore {
    /// Store backed by the record at `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full record, including its commit time.
    pub async fn record(&self) -> Result<Option<NodeIdRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(self.path_str(), e)),
        };
        let record = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: self.path_str(),
            reason: e.to_string(),
        })?;
        Ok(Some(record))
    }

    /// Administrative reset: delete the record.
    pub async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(self.path_str(), e)),
        }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    fn temp_path(&self) -> PathBuf {
        let mut out = self.path.as_os_str().to_os_string();
        out.push(format!(".tmp.{}.{}", std::process::id(), Uuid::new_v4().simple()));
        PathBuf::from(out)
    }

    async fn publish(&self, temp: &Path, node_id: &str) -> Result<(), StoreError> {
        let record = NodeIdRecord {
            node_id: node_id.to_string(),
            created_at: Utc::now(),
        };
        let body = serde_json::to_vec_pretty(&record).map_err(|e| StoreError::Corrupt {
            path: self.path_str(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(temp, &body)
            .await
            .map_err(|e| StoreError::io(temp.display().to_string(), e))?;

        match tokio::fs::hard_link(temp, &self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let existing = self.record().await?.map(|r| r.node_id).unwrap_or_default();
                if existing == node_id {
                    Ok(())
                } else {
                    Err(StoreError::Conflict { existing })
                }
            }
            Err(e) => Err(StoreError::io(self.path_str(), e)),
        }
    }
}

#[async_trait]
impl NodeIdStore for FileNodeIdStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        let record = self.record().await?;
        debug!(path = %self.path.display(), present = record.is_some(), "read node id record");
        Ok(record.map(|r| r.node_id))
    }

    async fn set(&self, node_id: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent.display().to_string(), e))?;
        }

        let temp = self.temp_path();
        let result = self.publish(&temp, node_id).await;
        if let Err(e) = tokio::fs::remove_file(&temp).await {
            if e.kind() != ErrorKind::NotFound {
                debug!(path = %temp.display(), error = %e, "failed to remove temp record");
            }
        }
        result
    }
}
