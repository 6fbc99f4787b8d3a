//! Cryptographic primitives for signed locators.
//!
//! This crate wraps the vetted algorithms the locator records rely on:
//!
//! - **Signatures**: Ed25519 over domain-separated messages
//! - **Hashing**: BLAKE3 for key digests
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Secrets must never be logged
//! - Secret key material is zeroized on drop
//! - Verification failure is a value (`false`), not an error

pub mod digest;
pub mod signing;

#[cfg(test)]
mod test_vectors;

pub use digest::{key_digest, KEY_DIGEST_LEN};
pub use signing::{
    build_domain_label, parse_verifying_key, purposes, verify, KeyPair, SigningError,
    PUBLIC_KEY_LEN, SECRET_KEY_LEN, SIGNATURE_LEN,
};
