//! In-memory node id store.

use async_trait::async_trait;
use nodeid_core::{NodeIdStore, StoreError};
use tokio::sync::Mutex;

/// Node id store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryNodeIdStore {
    value: Mutex<Option<String>>,
}

impl MemoryNodeIdStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `node_id`.
    pub fn with_value(node_id: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(node_id.into())),
        }
    }

    /// Administrative reset.
    pub async fn clear(&self) {
        *self.value.lock().await = None;
    }
}

#[async_trait]
impl NodeIdStore for MemoryNodeIdStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.lock().await.clone())
    }

    async fn set(&self, node_id: &str) -> Result<(), StoreError> {
        let mut value = self.value.lock().await;
        match value.as_deref() {
            Some(existing) if existing != node_id => Err(StoreError::Conflict {
                existing: existing.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                *value = Some(node_id.to_string());
                Ok(())
            }
        }
    }
}
