//! Node access for a single, non-clustered node.
//!
//! The node is the only member of its cluster: it is always the oldest
//! node and its alias is its own identity.

use async_trait::async_trait;
use nodeid_core::{
    AccessState, KeyStoreManager, Membership, NodeError, NodeId, NodeIdStore, Provenance, Result,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::access::NodeAccess;
use crate::resolve::resolve_identity;

/// State cached by a successful start.
#[derive(Debug)]
struct LocalNode {
    id: NodeId,
    provenance: Provenance,
    membership: Membership,
}

#[derive(Debug, Clone)]
enum Lifecycle {
    New,
    Resolving,
    Started(Arc<LocalNode>),
    Stopped,
}

impl Lifecycle {
    const fn state(&self) -> AccessState {
        match self {
            Self::New => AccessState::New,
            Self::Resolving => AccessState::Resolving,
            Self::Started(_) => AccessState::Started,
            Self::Stopped => AccessState::Stopped,
        }
    }
}

/// Puts the pre-start lifecycle back if a start is abandoned mid-resolution,
/// including when the `start()` future is dropped.
struct RestoreOnDrop<'a> {
    lifecycle: &'a RwLock<Lifecycle>,
    previous: Option<Lifecycle>,
}

impl RestoreOnDrop<'_> {
    fn disarm(mut self) {
        self.previous = None;
    }
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self
                .lifecycle
                .write()
                .unwrap_or_else(PoisonError::into_inner) = previous;
        }
    }
}

/// Local node access.
///
/// Construct once at process composition and share by `Arc`.
pub struct LocalNodeAccess {
    key_store: Arc<dyn KeyStoreManager>,
    store: Arc<dyn NodeIdStore>,
    /// Serialises start/stop so concurrent starts resolve once.
    transition: Mutex<()>,
    lifecycle: RwLock<Lifecycle>,
}

impl LocalNodeAccess {
    /// Wire node access to its key store and node id store.
    pub fn new(key_store: Arc<dyn KeyStoreManager>, store: Arc<dyn NodeIdStore>) -> Self {
        Self {
            key_store,
            store,
            transition: Mutex::new(()),
            lifecycle: RwLock::new(Lifecycle::New),
        }
    }

    fn current(&self) -> Lifecycle {
        self.lifecycle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_lifecycle(&self, next: Lifecycle) {
        *self
            .lifecycle
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn started(&self) -> Result<Arc<LocalNode>> {
        match self.current() {
            Lifecycle::Started(node) => Ok(node),
            other => Err(NodeError::InvalidState {
                state: other.state(),
            }),
        }
    }
}

#[async_trait]
impl NodeAccess for LocalNodeAccess {
    async fn start(&self) -> Result<NodeId> {
        let _guard = self.transition.lock().await;

        let previous = self.current();
        if let Lifecycle::Started(node) = &previous {
            return Ok(node.id.clone());
        }

        self.set_lifecycle(Lifecycle::Resolving);
        let restore = RestoreOnDrop {
            lifecycle: &self.lifecycle,
            previous: Some(previous),
        };
        match resolve_identity(self.store.as_ref(), self.key_store.as_ref()).await {
            Ok(resolved) => {
                info!(
                    node_id = %resolved.id,
                    provenance = %resolved.provenance,
                    "local node access started"
                );
                let node = LocalNode {
                    membership: Membership::single(resolved.id.clone()),
                    id: resolved.id,
                    provenance: resolved.provenance,
                };
                let id = node.id.clone();
                restore.disarm();
                self.set_lifecycle(Lifecycle::Started(Arc::new(node)));
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "failed to resolve node id");
                drop(restore);
                Err(e)
            }
        }
    }

    async fn stop(&self) {
        let _guard = self.transition.lock().await;
        if let Lifecycle::Started(node) = self.current() {
            self.set_lifecycle(Lifecycle::Stopped);
            info!(node_id = %node.id, "local node access stopped");
        }
    }

    fn state(&self) -> AccessState {
        self.current().state()
    }

    fn id(&self) -> Result<NodeId> {
        Ok(self.started()?.id.clone())
    }

    fn provenance(&self) -> Result<Provenance> {
        Ok(self.started()?.provenance)
    }

    fn is_clustered(&self) -> Result<bool> {
        self.started().map(|_| false)
    }

    fn member_ids(&self) -> Result<BTreeSet<NodeId>> {
        Ok(self.started()?.membership.member_ids())
    }

    fn is_oldest_node(&self) -> Result<bool> {
        let node = self.started()?;
        Ok(node.membership.is_oldest(&node.id))
    }

    fn member_aliases(&self) -> Result<HashMap<String, String>> {
        Ok(self.started()?.membership.aliases())
    }
}
