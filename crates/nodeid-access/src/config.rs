//! Node identity configuration.

use nodeid_core::{CertificateSubject, NodeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::keystore::{FileKeyStoreManager, KeyAlgorithm};
use crate::local::LocalNodeAccess;
use crate::store::FileNodeIdStore;

/// Configuration for node identity resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Root directory for node state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Node id record (default: `<data_dir>/node-id.json`).
    #[serde(default)]
    pub store_file: Option<PathBuf>,

    /// Key store directory (default: `<data_dir>/keystores/node`).
    #[serde(default)]
    pub keystore_dir: Option<PathBuf>,

    /// Key generation settings.
    #[serde(default)]
    pub key: KeyConfig,

    /// Distinguished name defaults for generated certificates.
    #[serde(default)]
    pub subject: SubjectConfig,
}

/// Key pair generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Key algorithm.
    #[serde(default)]
    pub algorithm: KeyAlgorithm,

    /// Certificate validity in days.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
}

/// Certificate subject defaults. The common name is supplied per key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Organization (O).
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Organizational unit (OU).
    #[serde(default = "default_unit")]
    pub organizational_unit: String,

    /// Locality (L).
    #[serde(default = "default_locality")]
    pub locality: String,

    /// State or province (ST).
    #[serde(default = "default_state")]
    pub state: String,

    /// Two-letter country code (C).
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_file: None,
            keystore_dir: None,
            key: KeyConfig::default(),
            subject: SubjectConfig::default(),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            algorithm: KeyAlgorithm::default(),
            validity_days: default_validity_days(),
        }
    }
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            organizational_unit: default_unit(),
            locality: default_locality(),
            state: default_state(),
            country: default_country(),
        }
    }
}

impl SubjectConfig {
    /// Full subject for `common_name`, or a random UUID when none is given.
    #[must_use]
    pub fn subject_for(&self, common_name: Option<&str>) -> CertificateSubject {
        let cn = common_name.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        CertificateSubject::new(
            cn,
            &self.organization,
            &self.organizational_unit,
            &self.locality,
            &self.state,
            &self.country,
        )
    }
}

impl NodeConfig {
    /// Default config file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("nodeid").join("config.toml"))
    }

    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> nodeid_core::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| NodeError::Config(format!("failed to read {}: {e}", path.display())))?;
            toml::from_str(&content).map_err(|e| NodeError::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Config rooted at `data_dir` with everything else defaulted.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reject settings that would produce unusable key material.
    pub fn validate(&self) -> nodeid_core::Result<()> {
        if self.key.validity_days == 0 {
            return Err(NodeError::Config(
                "key.validity_days must be at least 1".to_string(),
            ));
        }
        let country = self.subject.country.trim();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NodeError::Config(format!(
                "subject.country must be a two-letter code, got {:?}",
                self.subject.country
            )));
        }
        Ok(())
    }

    /// Resolved node id record path.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("node-id.json"))
    }

    /// Resolved key store directory.
    #[must_use]
    pub fn keystore_path(&self) -> PathBuf {
        self.keystore_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("keystores").join("node"))
    }

    /// File-backed node id store.
    #[must_use]
    pub fn open_store(&self) -> FileNodeIdStore {
        FileNodeIdStore::new(self.store_path())
    }

    /// File-backed key store.
    #[must_use]
    pub fn open_key_store(&self) -> FileKeyStoreManager {
        FileKeyStoreManager::new(
            self.keystore_path(),
            self.key.algorithm,
            self.key.validity_days,
        )
    }

    /// Local node access wired to the configured store and key store.
    #[must_use]
    pub fn local_node_access(&self) -> LocalNodeAccess {
        LocalNodeAccess::new(Arc::new(self.open_key_store()), Arc::new(self.open_store()))
    }
}

// Default value functions for serde.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".nodeid"), |d| d.join("nodeid"))
}

const fn default_validity_days() -> u32 {
    3650
}

fn default_organization() -> String {
    String::from("nodeid")
}

fn default_unit() -> String {
    String::from("cluster")
}

fn default_locality() -> String {
    String::from("Unknown")
}

fn default_state() -> String {
    String::from("Unknown")
}

fn default_country() -> String {
    String::from("US")
}
