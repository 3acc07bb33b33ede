#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PEM parsing error: {0}")]
    Pem(#[from] pem::PemError),

    #[error("unexpected PEM tag: {0}")]
    UnexpectedPemTag(String),

    #[error("key loading error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("X509 parsing error: {0}")]
    X509Parse(String),

    #[error("certificate subject does not carry the taxpayer RFC")]
    RfcNotFound,

    #[error("private key does not match the certificate public key")]
    KeyCertificateMismatch,

    #[error("signing operation failed: {0}")]
    Signing(openssl::error::ErrorStack),
}
