//! Enveloped XMLDSig signer over an element tree (C14N 1.0, RSA-SHA1).

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::debug;

use super::{Result, digest, ns, signed_info};
use crate::capsules::Capsule;
use crate::credentials::Credentials;
use crate::xml::{self, Element, NamespaceBindings, c14n};

/// Intermediate artifacts of one signing call, kept for inspection and
/// golden-output tests. Never reused across calls.
#[derive(Debug, Clone)]
pub struct SignatureArtifacts {
    /// Canonical form of the whole document, before the signature existed.
    pub digest_source: String,
    /// Base64 SHA-1 digest of `digest_source`.
    pub digest_value: String,
    /// Canonical form of the standalone `SignedInfo` fragment.
    pub signed_info_source: String,
    /// Base64 RSA-SHA1 signature over `signed_info_source`.
    pub signature_value: String,
}

/// Extra namespace bindings the SAT verifier expects on cancellation
/// documents.
pub fn default_extra_namespaces() -> NamespaceBindings {
    NamespaceBindings::new()
        .bind("xsd", ns::XSD)
        .bind("xsi", ns::XSI)
}

/// Drives digest, signed-info assembly, signing and enveloped embedding.
#[derive(Debug, Clone)]
pub struct DomSigner {
    extra_namespaces: NamespaceBindings,
}

impl Default for DomSigner {
    fn default() -> Self {
        Self::new(default_extra_namespaces())
    }
}

impl DomSigner {
    pub fn new(extra_namespaces: NamespaceBindings) -> Self {
        Self { extra_namespaces }
    }

    pub fn extra_namespaces(&self) -> &NamespaceBindings {
        &self.extra_namespaces
    }

    /// Builds the capsule's element tree, signs it and serializes the final
    /// document.
    pub fn sign_capsule<C: Capsule>(
        &self,
        capsule: &C,
        credentials: &Credentials,
    ) -> Result<String> {
        let mut root = capsule.to_element_tree();
        self.sign_document(&mut root, credentials)?;
        Ok(xml::serialize_document(&root, &self.extra_namespaces)?)
    }

    /// Signs an element tree in place, appending the `Signature` element as
    /// the last child of the root.
    ///
    /// The document digest is computed before the signature is inserted; the
    /// enveloped-signature transform tells the verifier to strip the
    /// `Signature` element before recomputing it. A signing failure leaves
    /// the tree untouched.
    pub fn sign_document(
        &self,
        root: &mut Element,
        credentials: &Credentials,
    ) -> Result<SignatureArtifacts> {
        let digest_source = c14n::canonicalize(root, &self.extra_namespaces);
        let digest_value = digest::sha1_base64(digest_source.as_bytes());
        debug!(digest = %digest_value, "document digest computed");

        let signed_info = signed_info::build(&digest_value);
        let signed_info_source = c14n::canonicalize(&signed_info, &self.extra_namespaces);

        let raw_signature = credentials.sign(signed_info_source.as_bytes())?;
        let signature_value = BASE64.encode(&raw_signature);

        let certificate_b64 = BASE64.encode(credentials.certificate_der());
        root.append_child(build_signature(
            signed_info,
            &signature_value,
            &certificate_b64,
        ));

        Ok(SignatureArtifacts {
            digest_source,
            digest_value,
            signed_info_source,
            signature_value,
        })
    }
}

fn build_signature(signed_info: Element, signature_value: &str, certificate_b64: &str) -> Element {
    let mut signature_value_element = Element::with_namespace("SignatureValue", ns::DS);
    signature_value_element.set_text(signature_value);

    let mut certificate = Element::with_namespace("X509Certificate", ns::DS);
    certificate.set_text(certificate_b64);
    let mut x509_data = Element::with_namespace("X509Data", ns::DS);
    x509_data.append_child(certificate);
    let mut key_info = Element::with_namespace("KeyInfo", ns::DS);
    key_info.append_child(x509_data);

    let mut signature = Element::with_namespace("Signature", ns::DS);
    signature.append_child(signed_info);
    signature.append_child(signature_value_element);
    signature.append_child(key_info);
    signature
}
