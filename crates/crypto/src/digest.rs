//! BLAKE3 digests over public key material.

use crate::signing::{build_domain_label, purposes};

/// Length of a public key digest.
pub const KEY_DIGEST_LEN: usize = 32;

/// Computes the domain-separated BLAKE3 digest of a public key.
///
/// This is the hash half of a fingerprint; the node address is cut from
/// its leading bytes.
pub fn key_digest(public_key: &[u8]) -> [u8; KEY_DIGEST_LEN] {
    let labelled = build_domain_label(purposes::KEY_DIGEST, public_key);
    *blake3::hash(&labelled).as_bytes()
}
