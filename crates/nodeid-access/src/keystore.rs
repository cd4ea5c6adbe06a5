//! Directory-backed key store for the node's key pair.
//!
//! ```text
//! <keystore_dir>/
//!   node.key   PKCS#8 private key (PEM, 0600)
//!   node.crt   self-signed certificate (PEM)
//! ```

use async_trait::async_trait;
use nodeid_core::{CertificateSubject, KeyStoreError, KeyStoreManager, NodeCertificate};
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, SignatureAlgorithm,
};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

const KEY_FILE: &str = "node.key";
const CERT_FILE: &str = "node.crt";

/// Key algorithm for generated node key pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAlgorithm {
    /// ECDSA with P-256
    #[default]
    EcdsaP256,
    /// ECDSA with P-384
    EcdsaP384,
    /// Ed25519
    Ed25519,
}

impl KeyAlgorithm {
    fn signature_algorithm(self) -> &'static SignatureAlgorithm {
        match self {
            Self::EcdsaP256 => &rcgen::PKCS_ECDSA_P256_SHA256,
            Self::EcdsaP384 => &rcgen::PKCS_ECDSA_P384_SHA384,
            Self::Ed25519 => &rcgen::PKCS_ED25519,
        }
    }
}

/// Key store keeping the node key pair as PEM files in one directory.
#[derive(Debug, Clone)]
pub struct FileKeyStoreManager {
    dir: PathBuf,
    algorithm: KeyAlgorithm,
    validity_days: u32,
}

impl FileKeyStoreManager {
    /// Key store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, algorithm: KeyAlgorithm, validity_days: u32) -> Self {
        Self {
            dir: dir.into(),
            algorithm,
            validity_days,
        }
    }

    /// Key store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE)
    }

    fn cert_path(&self) -> PathBuf {
        self.dir.join(CERT_FILE)
    }

    fn build_params(&self, subject: &CertificateSubject) -> CertificateParams {
        let mut params = CertificateParams::default();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, subject.common_name.as_str());
        dn.push(DnType::OrganizationName, subject.organization.as_str());
        dn.push(
            DnType::OrganizationalUnitName,
            subject.organizational_unit.as_str(),
        );
        dn.push(DnType::LocalityName, subject.locality.as_str());
        dn.push(DnType::StateOrProvinceName, subject.state.as_str());
        dn.push(DnType::CountryName, subject.country.as_str());
        params.distinguished_name = dn;

        params.is_ca = IsCa::NoCa;
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ];
        params.extended_key_usages = vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ];

        let now = time::OffsetDateTime::now_utc();
        params.not_before = now;
        params.not_after = now + time::Duration::days(i64::from(self.validity_days));

        let serial = Uuid::new_v4();
        params.serial_number = Some((serial.as_u128() as u64).into());

        params
    }

    async fn write_private_key(&self, pem: &str) -> Result<(), KeyStoreError> {
        use tokio::io::AsyncWriteExt;

        let path = self.key_path();
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| KeyStoreError::io(path.display().to_string(), e))?;
        file.write_all(pem.as_bytes())
            .await
            .map_err(|e| KeyStoreError::io(path.display().to_string(), e))?;
        file.sync_all()
            .await
            .map_err(|e| KeyStoreError::io(path.display().to_string(), e))
    }
}

#[async_trait]
impl KeyStoreManager for FileKeyStoreManager {
    async fn has_private_key(&self) -> Result<bool, KeyStoreError> {
        let key = self.key_path();
        let present = tokio::fs::try_exists(&key)
            .await
            .map_err(|e| KeyStoreError::io(key.display().to_string(), e))?;
        debug!(path = %key.display(), present, "checked for node private key");
        Ok(present)
    }

    async fn generate_and_store_key_pair(
        &self,
        subject: &CertificateSubject,
    ) -> Result<(), KeyStoreError> {
        let key_pair = KeyPair::generate_for(self.algorithm.signature_algorithm())
            .map_err(|e| KeyStoreError::Generation(e.to_string()))?;
        let certificate = self
            .build_params(subject)
            .self_signed(&key_pair)
            .map_err(|e| KeyStoreError::Generation(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| KeyStoreError::io(self.dir.display().to_string(), e))?;

        // Certificate before key: presence is decided by the key file.
        let cert_path = self.cert_path();
        tokio::fs::write(&cert_path, certificate.pem())
            .await
            .map_err(|e| KeyStoreError::io(cert_path.display().to_string(), e))?;
        self.write_private_key(&key_pair.serialize_pem()).await?;

        info!(
            dir = %self.dir.display(),
            common_name = %subject.common_name,
            algorithm = ?self.algorithm,
            "generated node key pair"
        );
        Ok(())
    }

    async fn certificate(&self) -> Result<NodeCertificate, KeyStoreError> {
        let path = self.cert_path();
        let pem = match tokio::fs::read(&path).await {
            Ok(pem) => pem,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KeyStoreError::NotFound {
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(KeyStoreError::io(path.display().to_string(), e)),
        };
        Ok(NodeCertificate::from_pem(pem)?)
    }

    async fn remove_private_key(&self) -> Result<(), KeyStoreError> {
        for path in [self.key_path(), self.cert_path()] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "removed key material"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(KeyStoreError::io(path.display().to_string(), e)),
            }
        }
        Ok(())
    }
}
