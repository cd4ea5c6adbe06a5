//! Local node access against file-backed store and key store.

use nodeid_access::{
    CertificateSubject, FileKeyStoreManager, FileNodeIdStore, KeyAlgorithm, KeyStoreManager,
    LocalNodeAccess, NodeAccess, NodeConfig, NodeError, NodeIdEncoding, NodeIdStore, Provenance,
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    dir: TempDir,
    key_store: Arc<FileKeyStoreManager>,
    store: Arc<FileNodeIdStore>,
    access: LocalNodeAccess,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let key_store = Arc::new(FileKeyStoreManager::new(
            dir.path().join("keystores"),
            KeyAlgorithm::EcdsaP256,
            30,
        ));
        let store = Arc::new(FileNodeIdStore::new(dir.path().join("db").join("node-id.json")));
        let access = LocalNodeAccess::new(key_store.clone(), store.clone());
        Self {
            dir,
            key_store,
            store,
            access,
        }
    }

    async fn teardown(self) {
        self.access.stop().await;
        self.key_store.remove_private_key().await.unwrap();
    }
}

#[tokio::test]
async fn generates_id() {
    let f = Fixture::new();
    let id = f.access.start().await.unwrap();

    let stored = f.store.get().await.unwrap();
    assert_eq!(stored.as_deref(), Some(id.as_str()));
    assert_eq!(f.access.provenance().unwrap(), Provenance::Generated);
    assert!(!f.key_store.has_private_key().await.unwrap());
    f.teardown().await;
}

#[tokio::test]
async fn uses_database_id() {
    let f = Fixture::new();
    f.store.set("foo").await.unwrap();
    f.access.start().await.unwrap();

    assert_eq!(f.access.id().unwrap().as_str(), "foo");
    f.teardown().await;
}

#[tokio::test]
async fn database_id_wins_over_existing_certificate() {
    let f = Fixture::new();
    f.store.set("foo").await.unwrap();
    f.key_store
        .generate_and_store_key_pair(&subject(&Uuid::new_v4().to_string()))
        .await
        .unwrap();
    f.access.start().await.unwrap();

    assert_eq!(f.access.id().unwrap().as_str(), "foo");
    f.teardown().await;
}

#[tokio::test]
async fn migrates_existing_id() {
    let f = Fixture::new();
    f.key_store
        .generate_and_store_key_pair(&subject(&Uuid::new_v4().to_string()))
        .await
        .unwrap();

    f.access.start().await.unwrap();
    let cert = f.key_store.certificate().await.unwrap();
    let expected = NodeIdEncoding::node_id_for_certificate(&cert).unwrap();
    assert_eq!(f.access.id().unwrap(), expected);
    assert_eq!(
        f.access.provenance().unwrap(),
        Provenance::MigratedFromCertificate
    );

    // A second node over the same store, without key material, resolves
    // to the migrated value from the store alone.
    let other_keys = Arc::new(FileKeyStoreManager::new(
        f.dir.path().join("other-keystores"),
        KeyAlgorithm::EcdsaP256,
        30,
    ));
    let other = LocalNodeAccess::new(other_keys, Arc::new(FileNodeIdStore::new(f.store.path())));
    assert_eq!(other.start().await.unwrap(), expected);
    assert_eq!(other.provenance().unwrap(), Provenance::Persisted);
    other.stop().await;

    f.teardown().await;
}

#[tokio::test]
async fn restart_keeps_id() {
    let f = Fixture::new();
    let first = f.access.start().await.unwrap();
    f.access.stop().await;

    let again = LocalNodeAccess::new(f.key_store.clone(), f.store.clone());
    assert_eq!(again.start().await.unwrap(), first);
    again.stop().await;
    f.teardown().await;
}

#[tokio::test]
async fn local_is_oldest_node() {
    let f = Fixture::new();
    f.access.start().await.unwrap();
    assert!(f.access.is_oldest_node().unwrap());
    f.teardown().await;
}

#[tokio::test]
async fn member_aliases_key_value_equal_to_identity() {
    let f = Fixture::new();
    f.access.start().await.unwrap();
    let id = f.access.id().unwrap().to_string();
    assert_eq!(
        f.access.member_aliases().unwrap(),
        HashMap::from([(id.clone(), id)])
    );
    f.teardown().await;
}

#[tokio::test]
async fn queries_before_start_fail() {
    let f = Fixture::new();
    assert!(matches!(f.access.id(), Err(NodeError::InvalidState { .. })));
    assert!(matches!(
        f.access.is_oldest_node(),
        Err(NodeError::InvalidState { .. })
    ));
    assert!(matches!(
        f.access.member_aliases(),
        Err(NodeError::InvalidState { .. })
    ));
    f.teardown().await;
}

#[tokio::test]
async fn corrupt_store_aborts_start() {
    let f = Fixture::new();
    std::fs::create_dir_all(f.store.path().parent().unwrap()).unwrap();
    std::fs::write(f.store.path(), "{ broken").unwrap();

    let err = f.access.start().await.unwrap_err();
    assert!(matches!(err, NodeError::Store(_)));
    assert!(f.access.id().is_err());
    f.teardown().await;
}

#[tokio::test]
async fn malformed_certificate_file_is_an_encoding_error() {
    let f = Fixture::new();
    let keys = f.key_store.dir();
    std::fs::create_dir_all(keys).unwrap();
    std::fs::write(keys.join("node.key"), "placeholder").unwrap();
    std::fs::write(keys.join("node.crt"), "not a certificate").unwrap();

    let err = f.access.start().await.unwrap_err();
    assert!(matches!(err, NodeError::Encoding(_)));
    assert!(!err.is_retryable());
    assert_eq!(f.store.get().await.unwrap(), None);
    f.teardown().await;
}

#[tokio::test]
async fn concurrent_bootstrap_converges() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("node-id.json");

    let mut handles = Vec::new();
    for i in 0..6 {
        let keys = Arc::new(FileKeyStoreManager::new(
            dir.path().join(format!("keys-{i}")),
            KeyAlgorithm::EcdsaP256,
            30,
        ));
        let access = LocalNodeAccess::new(keys, Arc::new(FileNodeIdStore::new(&store_path)));
        handles.push(tokio::spawn(async move { access.start().await }));
    }

    let committed = FileNodeIdStore::new(&store_path);
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    let expected = committed.get().await.unwrap().unwrap();
    assert!(ids.iter().all(|id| id.as_str() == expected));
}

#[tokio::test]
async fn config_wires_file_collaborators() {
    let dir = tempfile::tempdir().unwrap();
    let config = NodeConfig::with_data_dir(dir.path());
    let access = config.local_node_access();
    let id = access.start().await.unwrap();

    let store = config.open_store();
    assert_eq!(store.get().await.unwrap().as_deref(), Some(id.as_str()));
    assert!(config.store_path().exists());
}

fn subject(cn: &str) -> CertificateSubject {
    CertificateSubject::new(cn, "Example", "Ops", "Reykjavik", "CAP", "IS")
}
