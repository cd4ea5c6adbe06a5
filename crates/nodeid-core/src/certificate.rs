//! Node certificate handle and subject fields.

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// PEM tag for X.509 certificates.
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// A node certificate as raw DER bytes.
///
/// Construction does not validate the DER; parsing happens when the
/// certificate is encoded into an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCertificate {
    der: Vec<u8>,
}

impl NodeCertificate {
    /// Wrap DER bytes.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    /// Decode the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem_data: impl AsRef<[u8]>) -> Result<Self, EncodingError> {
        let blocks =
            pem::parse_many(pem_data.as_ref()).map_err(|e| EncodingError::Pem(e.to_string()))?;
        blocks
            .into_iter()
            .find(|p| p.tag() == CERTIFICATE_TAG)
            .map(|p| Self::from_der(p.into_contents()))
            .ok_or_else(|| EncodingError::Pem("no CERTIFICATE block found".to_string()))
    }

    /// DER encoding.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// PEM encoding.
    #[must_use]
    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(CERTIFICATE_TAG, self.der.clone()))
    }

    /// Parse enough of the certificate to describe it in logs and CLI output.
    pub fn summary(&self) -> Result<CertificateSummary, EncodingError> {
        let (_, cert) = x509_parser::parse_x509_certificate(&self.der)
            .map_err(|e| EncodingError::Der(e.to_string()))?;
        Ok(CertificateSummary {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial_as_string(),
            not_before: cert.validity().not_before.timestamp(),
            not_after: cert.validity().not_after.timestamp(),
        })
    }
}

/// Human-readable certificate fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Serial number (hex)
    pub serial: String,
    /// Not valid before (unix seconds)
    pub not_before: i64,
    /// Not valid after (unix seconds)
    pub not_after: i64,
}

/// Distinguished name fields for a generated node certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSubject {
    /// CN
    pub common_name: String,
    /// O
    pub organization: String,
    /// OU
    pub organizational_unit: String,
    /// L
    pub locality: String,
    /// ST
    pub state: String,
    /// C (two-letter country code)
    pub country: String,
}

impl CertificateSubject {
    /// Build a subject from all six distinguished name fields.
    pub fn new(
        common_name: impl Into<String>,
        organization: impl Into<String>,
        organizational_unit: impl Into<String>,
        locality: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            organization: organization.into(),
            organizational_unit: organizational_unit.into(),
            locality: locality.into(),
            state: state.into(),
            country: country.into(),
        }
    }
}
