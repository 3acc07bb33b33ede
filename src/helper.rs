use chrono::NaiveDateTime;

use crate::capsules::{self, Cancellation, Capsule, DocumentType, Folio, ObtainRelated, RfcRole};
use crate::credentials::Credentials;
use crate::dsig::{self, DomSigner};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("capsule construction error: {0}")]
    Capsule(#[from] capsules::Error),

    #[error("signing error: {0}")]
    Signing(#[from] dsig::Error),
}

/// Convenience facade: builds capsules from primitives on behalf of the
/// credential owner and hands them to the signer.
pub struct XmlCancelacionHelper {
    credentials: Credentials,
    signer: DomSigner,
}

impl XmlCancelacionHelper {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_signer(credentials, DomSigner::default())
    }

    pub fn with_signer(credentials: Credentials, signer: DomSigner) -> Self {
        Self {
            credentials,
            signer,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn signer(&self) -> &DomSigner {
        &self.signer
    }

    pub fn rfc(&self) -> &str {
        self.credentials.rfc()
    }

    /// Signs a CFDI cancellation for a single document.
    pub fn sign_cancellation_uuid(
        &self,
        uuid: &str,
        reason: &str,
        date: NaiveDateTime,
    ) -> Result<String> {
        let folio = Folio::new(uuid, reason)?;
        self.sign_cancellation(vec![folio], date)
    }

    pub fn sign_cancellation(&self, folios: Vec<Folio>, date: NaiveDateTime) -> Result<String> {
        self.sign_cancellation_as(folios, date, DocumentType::Cfdi)
    }

    pub fn sign_retention_cancellation(
        &self,
        folios: Vec<Folio>,
        date: NaiveDateTime,
    ) -> Result<String> {
        self.sign_cancellation_as(folios, date, DocumentType::Retention)
    }

    fn sign_cancellation_as(
        &self,
        folios: Vec<Folio>,
        date: NaiveDateTime,
        document_type: DocumentType,
    ) -> Result<String> {
        let capsule = Cancellation::with_document_type(self.rfc(), folios, date, document_type);
        self.sign_capsule(&capsule)
    }

    pub fn sign_obtain_related(
        &self,
        uuid: &str,
        role: RfcRole,
        pac_rfc: &str,
    ) -> Result<String> {
        let capsule = ObtainRelated::new(uuid, self.rfc(), role, pac_rfc);
        self.sign_capsule(&capsule)
    }

    pub fn sign_capsule<C: Capsule>(&self, capsule: &C) -> Result<String> {
        Ok(self.signer.sign_capsule(capsule, &self.credentials)?)
    }
}
