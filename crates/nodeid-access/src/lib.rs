//! # nodeid-access
//!
//! Resolves and serves a node's stable cluster identity.
//!
//! ## Startup
//!
//! ```text
//! start()
//!   └─ NodeIdStore::get ── present ──────────────▶ adopt
//!        └─ absent
//!           └─ KeyStoreManager::has_private_key
//!                ├─ yes: encode certificate ─┐
//!                └─ no:  generate UUID ──────┴─▶ NodeIdStore::set ─▶ adopt
//!                                                   └─ conflict ─▶ re-read, adopt committed
//! ```
//!
//! Once started, `id`, `is_oldest_node` and `member_aliases` read an
//! immutable snapshot; nothing re-enters resolution until `stop` + `start`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nodeid_access::{NodeAccess, NodeConfig};
//!
//! let access = NodeConfig::load(&path)?.local_node_access();
//! let id = access.start().await?;
//! assert!(access.is_oldest_node()?);
//! ```

pub mod access;
pub mod config;
pub mod keystore;
pub mod local;
pub mod resolve;
pub mod store;

#[cfg(test)]
mod test_support;

pub use access::NodeAccess;
pub use config::{KeyConfig, NodeConfig, SubjectConfig};
pub use keystore::{FileKeyStoreManager, KeyAlgorithm};
pub use local::LocalNodeAccess;
pub use store::{FileNodeIdStore, MemoryNodeIdStore, NodeIdRecord};

pub use nodeid_core::{
    AccessState, CertificateSubject, KeyStoreManager, NodeCertificate, NodeError, NodeId,
    NodeIdEncoding, NodeIdStore, Provenance, Result,
};
