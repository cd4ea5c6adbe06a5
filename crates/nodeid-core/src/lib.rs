//! # nodeid-core
//!
//! Types and collaborator contracts for resolving a node's cluster identity.
//!
//! ## Resolution precedence
//!
//! ```text
//! NodeIdStore has a value ──yes──▶ adopt it
//!        │ no
//! KeyStoreManager has a key ──yes──▶ encode certificate, persist, adopt
//!        │ no
//! generate UUID, persist, adopt
//! ```
//!
//! The orchestrator that runs this lives in `nodeid-access`; this crate
//! holds the pieces it is built from.

pub mod certificate;
pub mod encoding;
pub mod error;
pub mod id;
pub mod keystore;
pub mod lifecycle;
pub mod membership;
pub mod store;

pub use certificate::{CertificateSubject, CertificateSummary, NodeCertificate};
pub use encoding::NodeIdEncoding;
pub use error::{EncodingError, KeyStoreError, NodeError, Result, StoreError};
pub use id::{NodeId, Provenance};
pub use keystore::KeyStoreManager;
pub use lifecycle::AccessState;
pub use membership::{Member, Membership};
pub use store::NodeIdStore;
