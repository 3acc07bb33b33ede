mod error;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

use std::fmt;
use std::fs;
use std::path::Path;

use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sign::Signer;
use openssl::x509::X509;
use tracing::{debug, info};
use x509_parser::der_parser::oid;
use x509_parser::prelude::*;

// PEM tags accepted for certificates and private keys
const CERTIFICATE_TAGS: &[&str] = &["CERTIFICATE", "X509 CERTIFICATE", "TRUSTED CERTIFICATE"];
const PRIVATE_KEY_TAGS: &[&str] = &["PRIVATE KEY", "RSA PRIVATE KEY", "ENCRYPTED PRIVATE KEY"];

static OID_X500_UNIQUE_IDENTIFIER: oid::Oid<'static> = oid!(2.5.4.45);
static OID_SERIAL_NUMBER: oid::Oid<'static> = oid!(2.5.4.5);
static OID_COMMON_NAME: oid::Oid<'static> = oid!(2.5.4.3);

/// Subject field the taxpayer RFC is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RfcSource {
    /// x500UniqueIdentifier (2.5.4.45), the field SAT-issued certificates use.
    #[default]
    UniqueIdentifier,
    /// serialNumber (2.5.4.5).
    SerialNumber,
    /// commonName (2.5.4.3).
    CommonName,
}

impl RfcSource {
    fn oid(self) -> &'static oid::Oid<'static> {
        match self {
            RfcSource::UniqueIdentifier => &OID_X500_UNIQUE_IDENTIFIER,
            RfcSource::SerialNumber => &OID_SERIAL_NUMBER,
            RfcSource::CommonName => &OID_COMMON_NAME,
        }
    }
}

/// Signing credentials: taxpayer RFC, DER certificate and the decrypted
/// RSA private key.
///
/// The key is decrypted once at load and never re-derived; the passphrase is
/// not retained. A constructed value is read-only and safe to share across
/// threads.
#[derive(Clone)]
pub struct Credentials {
    rfc: String,
    certificate_der: Vec<u8>,
    private_key: PKey<Private>,
}

impl Credentials {
    pub fn from_pem_files(
        certificate_file: impl AsRef<Path>,
        private_key_file: impl AsRef<Path>,
        passphrase: &str,
    ) -> Result<Self> {
        let certificate_pem = fs::read(certificate_file.as_ref())?;
        let private_key_pem = fs::read(private_key_file.as_ref())?;
        Self::from_pem_data(&certificate_pem, &private_key_pem, passphrase)
    }

    pub fn from_pem_data(
        certificate_pem: &[u8],
        private_key_pem: &[u8],
        passphrase: &str,
    ) -> Result<Self> {
        Self::with_rfc_source(
            certificate_pem,
            private_key_pem,
            passphrase,
            RfcSource::default(),
        )
    }

    pub fn with_rfc_source(
        certificate_pem: &[u8],
        private_key_pem: &[u8],
        passphrase: &str,
        rfc_source: RfcSource,
    ) -> Result<Self> {
        let certificate = parse_pem(certificate_pem, CERTIFICATE_TAGS)?;
        let certificate_der = certificate.into_contents();

        parse_pem(private_key_pem, PRIVATE_KEY_TAGS)?;
        let private_key =
            PKey::private_key_from_pem_passphrase(private_key_pem, passphrase.as_bytes())?;
        debug!("private key decrypted");

        // reject a key that does not belong to the certificate
        let certificate_key = X509::from_der(&certificate_der)?.public_key()?;
        if !private_key.public_eq(&certificate_key) {
            return Err(Error::KeyCertificateMismatch);
        }

        let rfc = extract_rfc(&certificate_der, rfc_source)?;
        info!(%rfc, "credentials loaded");

        Ok(Self {
            rfc,
            certificate_der,
            private_key,
        })
    }

    /// Taxpayer RFC parsed from the certificate subject.
    pub fn rfc(&self) -> &str {
        &self.rfc
    }

    /// DER encoded X.509 certificate.
    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate_der
    }

    /// RSA PKCS#1 v1.5 signature over the SHA-1 digest of the input.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut signer =
            Signer::new(MessageDigest::sha1(), &self.private_key).map_err(Error::Signing)?;
        signer.update(data).map_err(Error::Signing)?;
        let signature = signer.sign_to_vec().map_err(Error::Signing)?;
        debug!(signature = %hex::encode(&signature), "rsa-sha1 signature created");
        Ok(signature)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("rfc", &self.rfc)
            .field("certificate_der", &self.certificate_der.len())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

fn parse_pem(data: &[u8], expected_tags: &[&str]) -> Result<::pem::Pem> {
    let block = ::pem::parse(data)?;
    if !expected_tags.contains(&block.tag()) {
        return Err(Error::UnexpectedPemTag(block.tag().to_string()));
    }
    Ok(block)
}

fn extract_rfc(certificate_der: &[u8], source: RfcSource) -> Result<String> {
    let (_, certificate) = X509Certificate::from_der(certificate_der)
        .map_err(|e| Error::X509Parse(e.to_string()))?;
    for attribute in certificate.subject().iter_attributes() {
        if attribute.attr_type() != source.oid() {
            continue;
        }
        let value = attribute
            .as_str()
            .map_err(|e| Error::X509Parse(e.to_string()))?;
        let value = value.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }
    Err(Error::RfcNotFound)
}
