mod digest;
mod error;
mod signed_info;
mod signer;

pub use error::Error;
pub use signer::{DomSigner, SignatureArtifacts, default_extra_namespaces};

pub type Result<T> = std::result::Result<T, Error>;

// Algorithm URIs fixed by XMLDSig core; the verifier matches them literally
pub mod algorithms {
    // Canonicalization algorithms
    pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";

    // Signature algorithms
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";

    // Digest algorithms
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";

    // Transform algorithms
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
}

// Namespaces
pub mod ns {
    pub const DS: &str = "http://www.w3.org/2000/09/xmldsig#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}
