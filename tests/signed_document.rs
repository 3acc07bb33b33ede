use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::NaiveDateTime;
use openssl::hash::MessageDigest;
use openssl::sign::Verifier;
use openssl::x509::X509;

use xml_cancelacion::capsules::{Cancellation, Capsule, Folio};
use xml_cancelacion::credentials::Credentials;
use xml_cancelacion::dsig::{DomSigner, SignatureArtifacts};
use xml_cancelacion::xml::{self, Element, parse_document};

const CER_PEM: &[u8] = include_bytes!("../test_data/LAN7008173R5.cer.pem");
const KEY_PEM: &[u8] = include_bytes!("../test_data/LAN7008173R5.key.pem");
const PASSPHRASE: &str = include_str!("../test_data/LAN7008173R5.password");

const EXPECTED_DIGEST_SOURCE: &str = concat!(
    r#"<Cancelacion xmlns="http://cancelacfd.sat.gob.mx""#,
    r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
    r#" Fecha="2019-04-05T16:29:17" RfcEmisor="LAN7008173R5">"#,
    r#"<Folios><Folio Motivo="02" UUID="E174F807-BEFA-4CF6-9B11-2A013B12F398"></Folio></Folios>"#,
    r#"</Cancelacion>"#
);

const EXPECTED_DIGEST_VALUE: &str = "YBtGnfi2aq9RXXOWt5dtZpYOidg=";

const EXPECTED_SIGNED_INFO: &str = concat!(
    r#"<SignedInfo xmlns="http://www.w3.org/2000/09/xmldsig#""#,
    r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    r#"<CanonicalizationMethod Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315">"#,
    r#"</CanonicalizationMethod>"#,
    r#"<SignatureMethod Algorithm="http://www.w3.org/2000/09/xmldsig#rsa-sha1"></SignatureMethod>"#,
    r#"<Reference URI="">"#,
    r#"<Transforms>"#,
    r#"<Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"></Transform>"#,
    r#"</Transforms>"#,
    r#"<DigestMethod Algorithm="http://www.w3.org/2000/09/xmldsig#sha1"></DigestMethod>"#,
    r#"<DigestValue>YBtGnfi2aq9RXXOWt5dtZpYOidg=</DigestValue>"#,
    r#"</Reference>"#,
    r#"</SignedInfo>"#
);

fn credentials() -> Credentials {
    Credentials::from_pem_data(CER_PEM, KEY_PEM, PASSPHRASE).expect("Failed to load credentials")
}

fn preset_capsule() -> Cancellation {
    let folio = Folio::new("E174F807-BEFA-4CF6-9B11-2A013B12F398", "02").unwrap();
    let date = NaiveDateTime::parse_from_str("2019-04-05T16:29:17", "%Y-%m-%dT%H:%M:%S").unwrap();
    Cancellation::new("LAN7008173R5", vec![folio], date)
}

fn sign_preset() -> (Element, SignatureArtifacts) {
    let mut root = preset_capsule().to_element_tree();
    let artifacts = DomSigner::default()
        .sign_document(&mut root, &credentials())
        .expect("Failed to sign document");
    (root, artifacts)
}

#[test]
fn test_created_values_match_verifier_expectations() {
    let (_, artifacts) = sign_preset();

    assert_eq!(artifacts.digest_source, EXPECTED_DIGEST_SOURCE);
    assert_eq!(artifacts.digest_value, EXPECTED_DIGEST_VALUE);
    assert_eq!(artifacts.signed_info_source, EXPECTED_SIGNED_INFO);
    assert!(!artifacts.signature_value.is_empty());
}

#[test]
fn test_signature_verifies_against_certificate() {
    let (_, artifacts) = sign_preset();

    let certificate = X509::from_pem(CER_PEM).unwrap();
    let public_key = certificate.public_key().unwrap();
    let raw_signature = BASE64.decode(&artifacts.signature_value).unwrap();

    let mut verifier = Verifier::new(MessageDigest::sha1(), &public_key).unwrap();
    verifier
        .update(artifacts.signed_info_source.as_bytes())
        .unwrap();
    assert!(verifier.verify(&raw_signature).unwrap());
}

#[test]
fn test_signing_is_deterministic() {
    let (_, first) = sign_preset();
    let (_, second) = sign_preset();

    assert_eq!(first.digest_value, second.digest_value);
    assert_eq!(first.signature_value, second.signature_value);
}

#[test]
fn test_signature_is_appended_as_last_child() {
    let (root, _) = sign_preset();

    assert_eq!(root.children().len(), 2);
    let signature = root.children().last().unwrap();
    assert_eq!(signature.tag(), "Signature");
    assert_eq!(signature.namespace(), Some("http://www.w3.org/2000/09/xmldsig#"));
}

#[test]
fn test_serialized_document_structure() {
    let signer = DomSigner::default();
    let xml = signer
        .sign_capsule(&preset_capsule(), &credentials())
        .unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Cancelacion"));
    assert!(xml.contains(r#"xmlns="http://cancelacfd.sat.gob.mx""#));
    assert!(xml.contains(r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema""#));
    assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
    assert!(xml.contains("<DigestValue>YBtGnfi2aq9RXXOWt5dtZpYOidg=</DigestValue>"));
    assert!(xml.contains("<X509Certificate>"));
    assert!(xml.ends_with("</Signature></Cancelacion>"));
    // no pretty printing
    assert!(!xml.contains('\n'));
}

#[test]
fn test_verifier_side_digest_recomputation() {
    // act as the remote verifier: parse the serialized document, strip the
    // enveloped Signature element and recompute the digest
    let signer = DomSigner::default();
    let xml = signer
        .sign_capsule(&preset_capsule(), &credentials())
        .unwrap();

    let body = xml
        .strip_prefix("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")
        .unwrap();
    let (parsed, bindings) = parse_document(body).unwrap();

    let mut stripped = Element::with_namespace(parsed.tag(), parsed.namespace().unwrap());
    for (name, value) in parsed.attributes() {
        stripped.set_attribute(name, value);
    }
    for child in parsed.children() {
        if child.tag() != "Signature" {
            stripped.append_child(child.clone());
        }
    }

    let recomputed = xml::c14n::canonicalize(&stripped, &bindings);
    assert_eq!(recomputed, EXPECTED_DIGEST_SOURCE);
}
