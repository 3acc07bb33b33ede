use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use openssl::sha::sha1;

/// SHA-1 digest of a canonical byte sequence, base64 encoded.
pub fn sha1_base64(data: &[u8]) -> String {
    BASE64.encode(sha1(data))
}
