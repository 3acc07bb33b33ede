use super::{algorithms, ns};
use crate::xml::Element;

/// Builds the fixed `SignedInfo` fragment for a single enveloped reference
/// over the whole document (`URI=""`).
///
/// The fragment is canonicalized standalone before signing, so it must later
/// be given the same ambient namespace bindings as the enclosing document
/// even though nothing inside it uses them.
pub fn build(digest_value: &str) -> Element {
    let mut canonicalization = Element::with_namespace("CanonicalizationMethod", ns::DS);
    canonicalization.set_attribute("Algorithm", algorithms::C14N);

    let mut signature_method = Element::with_namespace("SignatureMethod", ns::DS);
    signature_method.set_attribute("Algorithm", algorithms::RSA_SHA1);

    let mut transform = Element::with_namespace("Transform", ns::DS);
    transform.set_attribute("Algorithm", algorithms::ENVELOPED_SIGNATURE);
    let mut transforms = Element::with_namespace("Transforms", ns::DS);
    transforms.append_child(transform);

    let mut digest_method = Element::with_namespace("DigestMethod", ns::DS);
    digest_method.set_attribute("Algorithm", algorithms::SHA1);

    let mut digest = Element::with_namespace("DigestValue", ns::DS);
    digest.set_text(digest_value);

    let mut reference = Element::with_namespace("Reference", ns::DS);
    reference.set_attribute("URI", "");
    reference.append_child(transforms);
    reference.append_child(digest_method);
    reference.append_child(digest);

    let mut signed_info = Element::with_namespace("SignedInfo", ns::DS);
    signed_info.append_child(canonicalization);
    signed_info.append_child(signature_method);
    signed_info.append_child(reference);
    signed_info
}
