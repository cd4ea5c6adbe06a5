//! Node key material.

use async_trait::async_trait;

use crate::certificate::{CertificateSubject, NodeCertificate};
use crate::error::KeyStoreError;

/// Owner of the node's private key and certificate.
///
/// Callers never see the private key; they observe presence and read the
/// certificate.
#[async_trait]
pub trait KeyStoreManager: Send + Sync {
    /// True if a private key and certificate have been stored.
    async fn has_private_key(&self) -> Result<bool, KeyStoreError>;

    /// Generate a key pair with a certificate for `subject` and store both,
    /// replacing any existing material.
    async fn generate_and_store_key_pair(
        &self,
        subject: &CertificateSubject,
    ) -> Result<(), KeyStoreError>;

    /// The stored certificate.
    async fn certificate(&self) -> Result<NodeCertificate, KeyStoreError>;

    /// Delete the key pair. No-op when nothing is stored.
    async fn remove_private_key(&self) -> Result<(), KeyStoreError>;
}
