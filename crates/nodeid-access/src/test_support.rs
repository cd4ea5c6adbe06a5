//! Collaborator doubles for unit tests.

use async_trait::async_trait;
use nodeid_core::{
    CertificateSubject, KeyStoreError, KeyStoreManager, NodeCertificate, NodeIdStore, StoreError,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::store::MemoryNodeIdStore;

/// Wraps a store and counts calls. In racing mode the first `set` is
/// preceded by another writer committing `winner`.
pub struct CountingStore<S> {
    inner: S,
    reads: AtomicUsize,
    writes: AtomicUsize,
    winner: Option<String>,
    raced: AtomicBool,
}

impl<S: NodeIdStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            winner: None,
            raced: AtomicBool::new(false),
        }
    }

    pub fn racing(inner: S, winner: &str) -> Self {
        Self {
            winner: Some(winner.to_string()),
            ..Self::new(inner)
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: NodeIdStore> NodeIdStore for CountingStore<S> {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get().await
    }

    async fn set(&self, node_id: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(winner) = &self.winner {
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.set(winner).await?;
            }
        }
        self.inner.set(node_id).await
    }
}

/// Store whose backend is unreachable.
pub struct FailingStore;

#[async_trait]
impl NodeIdStore for FailingStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _node_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// In-memory store whose reads stall for a configurable delay.
pub struct SlowStore {
    inner: MemoryNodeIdStore,
    delay: Mutex<Duration>,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryNodeIdStore::new(),
            delay: Mutex::new(delay),
        }
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl NodeIdStore for SlowStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        let delay = *self.delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.inner.get().await
    }

    async fn set(&self, node_id: &str) -> Result<(), StoreError> {
        self.inner.set(node_id).await
    }
}

/// Store that rejects every write as conflicting yet never returns a record.
#[derive(Default)]
pub struct VanishingStore {
    reads: AtomicUsize,
}

impl VanishingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeIdStore for VanishingStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn set(&self, _node_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Conflict {
            existing: "committed-then-deleted".to_string(),
        })
    }
}

enum Material {
    Empty,
    Certificate(NodeCertificate),
    Broken,
}

/// In-memory key store.
pub struct FakeKeyStore {
    material: Mutex<Material>,
    certificate_reads: AtomicUsize,
}

impl FakeKeyStore {
    fn with_material(material: Material) -> Self {
        Self {
            material: Mutex::new(material),
            certificate_reads: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_material(Material::Empty)
    }

    pub fn with_certificate(cn: &str) -> Self {
        Self::with_material(Material::Certificate(self_signed(cn)))
    }

    /// Key present, certificate bytes are not X.509.
    pub fn with_garbage() -> Self {
        Self::with_material(Material::Certificate(NodeCertificate::from_der(
            b"definitely not DER".to_vec(),
        )))
    }

    /// Every call fails with an I/O error.
    pub fn broken() -> Self {
        Self::with_material(Material::Broken)
    }

    pub fn certificate_reads(&self) -> usize {
        self.certificate_reads.load(Ordering::SeqCst)
    }
}

fn self_signed(cn: &str) -> NodeCertificate {
    let key = rcgen::KeyPair::generate().unwrap();
    let mut params = rcgen::CertificateParams::default();
    let mut dn = rcgen::DistinguishedName::new();
    dn.push(rcgen::DnType::CommonName, cn);
    params.distinguished_name = dn;
    NodeCertificate::from_der(params.self_signed(&key).unwrap().der().to_vec())
}

fn broken_io() -> KeyStoreError {
    KeyStoreError::io(
        "/dev/null/keystore",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    )
}

#[async_trait]
impl KeyStoreManager for FakeKeyStore {
    async fn has_private_key(&self) -> Result<bool, KeyStoreError> {
        match &*self.material.lock().unwrap() {
            Material::Empty => Ok(false),
            Material::Certificate(_) => Ok(true),
            Material::Broken => Err(broken_io()),
        }
    }

    async fn generate_and_store_key_pair(
        &self,
        subject: &CertificateSubject,
    ) -> Result<(), KeyStoreError> {
        *self.material.lock().unwrap() = Material::Certificate(self_signed(&subject.common_name));
        Ok(())
    }

    async fn certificate(&self) -> Result<NodeCertificate, KeyStoreError> {
        self.certificate_reads.fetch_add(1, Ordering::SeqCst);
        match &*self.material.lock().unwrap() {
            Material::Certificate(cert) => Ok(cert.clone()),
            Material::Empty => Err(KeyStoreError::NotFound {
                path: "memory".to_string(),
            }),
            Material::Broken => Err(broken_io()),
        }
    }

    async fn remove_private_key(&self) -> Result<(), KeyStoreError> {
        *self.material.lock().unwrap() = Material::Empty;
        Ok(())
    }
}
