//! Contract every node access implementation exposes to the rest of the process.

use async_trait::async_trait;
use nodeid_core::{AccessState, NodeId, Provenance, Result};
use std::collections::{BTreeSet, HashMap};

/// Node identity and cluster coordination queries.
///
/// `start` resolves and caches the identity; every query reads that cache
/// and fails with [`NodeError::InvalidState`](nodeid_core::NodeError::InvalidState)
/// outside the started state.
#[async_trait]
pub trait NodeAccess: Send + Sync {
    /// Resolve the node identity. Idempotent while started.
    async fn start(&self) -> Result<NodeId>;

    /// Release cached state. No-op unless started.
    async fn stop(&self);

    /// Current lifecycle state.
    fn state(&self) -> AccessState;

    /// This node's identity.
    fn id(&self) -> Result<NodeId>;

    /// How the identity was obtained.
    fn provenance(&self) -> Result<Provenance>;

    /// True if this node is part of a multi-member cluster.
    fn is_clustered(&self) -> Result<bool>;

    /// Identities of all known members, including this node.
    fn member_ids(&self) -> Result<BTreeSet<NodeId>>;

    /// True iff no other live member joined before this node.
    fn is_oldest_node(&self) -> Result<bool>;

    /// Member identity to display alias.
    fn member_aliases(&self) -> Result<HashMap<String, String>>;
}
