//! Fixed-key vectors pinning down key derivation and signing stability.

use crate::digest::key_digest;
use crate::signing::{purposes, verify, KeyPair};

/// RFC 8032 test 1 secret key.
///
/// ⚠️ WARNING: DO NOT USE IN PRODUCTION ⚠️
///
/// This key is publicly known and only exists for reproducible tests.
pub const TEST_VECTOR_PRIVATE_KEY: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c, 0xc4,
    0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
];

/// RFC 8032 test 1 public key.
pub const TEST_VECTOR_PUBLIC_KEY_HEX: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

#[test]
fn test_vector_public_key_derivation() {
    let keypair = KeyPair::from_secret_bytes(&TEST_VECTOR_PRIVATE_KEY).unwrap();
    assert_eq!(hex::encode(keypair.public_key()), TEST_VECTOR_PUBLIC_KEY_HEX);
}

/// `key_digest` of the test 1 public key.
const KEY_DIGEST_HEX: &str = "f6af69f40c1c7e300603923b82c98f7a1b307cb5bf437b614842946038eb96a4";

/// Locator signature by the test 1 key over `b"locator payload"`.
const LOCATOR_SIG_HEX: &str = concat!(
    "fe1d4c653f797e29a84d57becd04a32d0dcc0432f3fecf3db5cffe2da1ce2b86",
    "77c7c81e12e83613c958ffc4d865e5198379c54cbe7927887d938d4ef4b97f05",
);

#[test]
fn test_vector_locator_signature() {
    let keypair = KeyPair::from_secret_bytes(&TEST_VECTOR_PRIVATE_KEY).unwrap();
    let message = b"locator payload";

    let signature = keypair.sign(purposes::LOCATOR_SIG, message);

    assert_eq!(hex::encode(signature), LOCATOR_SIG_HEX);
    assert!(verify(
        &keypair.verifying_key(),
        purposes::LOCATOR_SIG,
        message,
        &signature
    ));
}

#[test]
fn test_vector_key_digest() {
    let public = hex::decode(TEST_VECTOR_PUBLIC_KEY_HEX).unwrap();
    assert_eq!(hex::encode(key_digest(&public)), KEY_DIGEST_HEX);
}
