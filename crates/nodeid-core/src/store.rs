//! Persistent node id record.

use async_trait::async_trait;

use crate::error::StoreError;

/// Single-row store holding the resolved node identity.
///
/// Each call is its own unit of work. `set` is insert-only: committing a
/// value different from an already committed one fails with
/// [`StoreError::Conflict`], while re-committing the same value succeeds.
#[async_trait]
pub trait NodeIdStore: Send + Sync {
    /// Read the committed identity, if any.
    async fn get(&self) -> Result<Option<String>, StoreError>;

    /// Commit an identity.
    async fn set(&self, node_id: &str) -> Result<(), StoreError>;
}
