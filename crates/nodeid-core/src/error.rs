//! Error taxonomy for node identity resolution.

use thiserror::Error;

use crate::lifecycle::AccessState;

/// Result type alias for node identity operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Failures reported by a [`NodeIdStore`](crate::NodeIdStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable or timed out.
    #[error("node id store unavailable: {0}")]
    Unavailable(String),

    /// Another writer committed a different identity first.
    #[error("node id already committed as {existing}")]
    Conflict {
        /// The value that won the write
        existing: String,
    },

    /// The persisted record could not be decoded.
    #[error("node id record at {path} is corrupt: {reason}")]
    Corrupt {
        /// Location of the record
        path: String,
        /// Decoder message
        reason: String,
    },

    /// I/O failure against the backing file.
    #[error("node id store I/O error at {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if a supervisor may retry the operation.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io { .. })
    }
}

/// Failures reported by a [`KeyStoreManager`](crate::KeyStoreManager).
#[derive(Error, Debug)]
pub enum KeyStoreError {
    /// No key material has been generated.
    #[error("no key material found at {path}")]
    NotFound {
        /// Expected location
        path: String,
    },

    /// Key pair or certificate generation failed.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// Stored certificate is not a decodable certificate.
    #[error("stored certificate is malformed: {0}")]
    Malformed(#[from] EncodingError),

    /// I/O failure against the key store.
    #[error("key store I/O error at {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl KeyStoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A certificate could not be turned into a node identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Certificate bytes were empty.
    #[error("certificate is empty")]
    Empty,

    /// PEM decoding failed.
    #[error("certificate PEM decode failed: {0}")]
    Pem(String),

    /// DER is not a well-formed X.509 certificate.
    #[error("certificate DER parse failed: {0}")]
    Der(String),
}

/// Errors surfaced by node access operations.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Reading or writing the persisted identity failed.
    #[error("node id store error: {0}")]
    Store(#[from] StoreError),

    /// Key store lookup or certificate retrieval failed.
    #[error("key store error: {0}")]
    Crypto(KeyStoreError),

    /// Legacy certificate could not be encoded.
    #[error("identity encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Query issued outside the started state.
    #[error("node access is not started (state: {state})")]
    InvalidState {
        /// State observed at call time
        state: AccessState,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<KeyStoreError> for NodeError {
    fn from(e: KeyStoreError) -> Self {
        match e {
            KeyStoreError::Malformed(e) => Self::Encoding(e),
            other => Self::Crypto(other),
        }
    }
}

impl NodeError {
    /// Returns true if a process supervisor may retry `start()`.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Returns true if the error is a caller programming error.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}
