//! Identity resolution: store first, then certificate migration, then generation.

use nodeid_core::{
    KeyStoreManager, NodeError, NodeId, NodeIdEncoding, NodeIdStore, Provenance, Result,
    StoreError,
};
use tracing::{debug, info, warn};

/// Outcome of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: NodeId,
    pub provenance: Provenance,
}

/// Resolve the node identity.
///
/// A committed store value always wins. Otherwise an existing certificate
/// is encoded and committed (one-way migration), and failing that a new
/// identity is generated and committed. Key material is never created here.
pub async fn resolve_identity(
    store: &dyn NodeIdStore,
    key_store: &dyn KeyStoreManager,
) -> Result<Resolved> {
    if let Some(existing) = store.get().await? {
        debug!(node_id = %existing, "using node id from store");
        return Ok(Resolved {
            id: NodeId::new(existing),
            provenance: Provenance::Persisted,
        });
    }

    let (candidate, provenance) = if key_store.has_private_key().await? {
        let certificate = key_store.certificate().await?;
        let id = NodeIdEncoding::node_id_for_certificate(&certificate)?;
        info!(node_id = %id, "migrating certificate-derived node id to store");
        (id, Provenance::MigratedFromCertificate)
    } else {
        let id = NodeId::generate();
        info!(node_id = %id, "generated new node id");
        (id, Provenance::Generated)
    };

    persist(store, candidate, provenance).await
}

/// Commit `candidate`, deferring to whatever value another writer committed first.
async fn persist(
    store: &dyn NodeIdStore,
    candidate: NodeId,
    provenance: Provenance,
) -> Result<Resolved> {
    match store.set(candidate.as_str()).await {
        Ok(()) => Ok(Resolved {
            id: candidate,
            provenance,
        }),
        Err(StoreError::Conflict { existing }) => {
            warn!(
                candidate = %candidate,
                existing = %existing,
                "node id write lost to a concurrent writer, re-reading store"
            );
            match store.get().await? {
                Some(committed) => Ok(Resolved {
                    id: NodeId::new(committed),
                    provenance: Provenance::Persisted,
                }),
                None => Err(NodeError::Store(StoreError::Unavailable(
                    "node id record missing after conflicting write".to_string(),
                ))),
            }
        }
        Err(e) => Err(e.into()),
    }
}
