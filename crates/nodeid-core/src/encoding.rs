//! Legacy certificate-derived node identity.
//!
//! Before identities were persisted in the node id store, a node was known
//! by a digest of its certificate. The format is kept stable so a node
//! migrating from that scheme keeps the identity its peers already know:
//!
//! ```text
//! SHA-1(DER) = 0123abcd4567ef01...   (40 hex chars)
//! node id    = 0123ABCD-4567EF01-...-XXXXXXXX
//! ```

use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};

use crate::certificate::NodeCertificate;
use crate::error::EncodingError;
use crate::id::NodeId;

/// Width of each dash-separated group.
const GROUP_LEN: usize = 8;

/// Group separator. Script-friendly.
const SEPARATOR: char = '-';

/// Derives node identities from certificates.
pub struct NodeIdEncoding;

impl NodeIdEncoding {
    /// Compute the node identity for a certificate.
    ///
    /// Pure function of the DER bytes. The DER must parse as a single
    /// X.509 certificate with no trailing data.
    pub fn node_id_for_certificate(cert: &NodeCertificate) -> Result<NodeId, EncodingError> {
        let der = cert.der();
        if der.is_empty() {
            return Err(EncodingError::Empty);
        }

        let (rest, _) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| EncodingError::Der(e.to_string()))?;
        if !rest.is_empty() {
            return Err(EncodingError::Der(format!(
                "{} trailing bytes after certificate",
                rest.len()
            )));
        }

        let sha1 = digest(&SHA1_FOR_LEGACY_USE_ONLY, der);
        Ok(Self::node_id_for_sha1(&hex::encode(sha1.as_ref())))
    }

    /// Format a hex SHA-1 as a node identity.
    #[must_use]
    pub fn node_id_for_sha1(sha1_hex: &str) -> NodeId {
        let upper = sha1_hex.to_ascii_uppercase();
        let mut out = String::with_capacity(upper.len() + upper.len() / GROUP_LEN);
        for (i, ch) in upper.chars().enumerate() {
            if i > 0 && i % GROUP_LEN == 0 {
                out.push(SEPARATOR);
            }
            out.push(ch);
        }
        NodeId::new(out)
    }
}
