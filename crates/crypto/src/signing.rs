//! Ed25519 signing with domain separation.
//!
//! Every signed message is prefixed with a structured label:
//! `"LOCATOR-v1." || purpose || "." || len(message) as 4-byte BE || message`
//!
//! so that a signature produced for one purpose can never be replayed as a
//! signature for another.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of an Ed25519 secret key seed.
pub const SECRET_KEY_LEN: usize = 32;
/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

const DOMAIN_PREFIX: &[u8] = b"LOCATOR-v1.";

/// Well-known domain separation purposes.
pub mod purposes {
    /// Locator payload signature.
    pub const LOCATOR_SIG: &str = "LOCATOR-SIG";
    /// Public key digest used for fingerprints.
    pub const KEY_DIGEST: &str = "KEY-DIGEST";
}

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid key length: {actual} (expected {expected})")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid public key: {reason}")]
    InvalidPublicKey { reason: String },

    #[error("Missing private key")]
    MissingPrivateKey,
}

impl From<SigningError> for locator_core::Error {
    fn from(e: SigningError) -> Self {
        locator_core::Error::InvalidParameter(e.to_string())
    }
}

/// Build a domain-separated message.
pub fn build_domain_label(purpose: &str, message: &[u8]) -> Vec<u8> {
    let mut label =
        Vec::with_capacity(DOMAIN_PREFIX.len() + purpose.len() + 1 + 4 + message.len());
    label.extend_from_slice(DOMAIN_PREFIX);
    label.extend_from_slice(purpose.as_bytes());
    label.extend_from_slice(b".");
    label.extend_from_slice(&(message.len() as u32).to_be_bytes());
    label.extend_from_slice(message);
    label
}

/// Ed25519 key pair holding a private key.
///
/// The underlying `SigningKey` zeroizes itself on drop.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a new key pair from the thread-local CSPRNG.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut rng = rand::thread_rng();
        let mut secret_key_bytes = [0u8; SECRET_KEY_LEN];
        rng.fill_bytes(&mut secret_key_bytes);

        let signing_key = SigningKey::from_bytes(&secret_key_bytes);
        secret_key_bytes.zeroize();

        Self { signing_key }
    }

    /// Restores a key pair from a 32-byte secret seed.
    ///
    /// # Security
    /// The intermediate copy of the seed is zeroized.
    pub fn from_secret_bytes(key_bytes: &[u8]) -> Result<Self, SigningError> {
        if key_bytes.len() != SECRET_KEY_LEN {
            return Err(SigningError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: key_bytes.len(),
            });
        }

        let mut key_array = [0u8; SECRET_KEY_LEN];
        key_array.copy_from_slice(key_bytes);
        let signing_key = SigningKey::from_bytes(&key_array);
        key_array.zeroize();

        Ok(Self { signing_key })
    }

    /// The 32-byte secret seed, wiped when the returned guard is dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Signs `message` under the given domain separation purpose.
    pub fn sign(&self, purpose: &str, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        let labelled = build_domain_label(purpose, message);
        self.signing_key.sign(&labelled).to_bytes()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

/// Parses raw public key bytes into a verifying key.
pub fn parse_verifying_key(bytes: &[u8]) -> Result<VerifyingKey, SigningError> {
    let array: [u8; PUBLIC_KEY_LEN] =
        bytes
            .try_into()
            .map_err(|_| SigningError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            })?;
    VerifyingKey::from_bytes(&array).map_err(|e| SigningError::InvalidPublicKey {
        reason: e.to_string(),
    })
}

/// Verifies a domain-separated Ed25519 signature.
///
/// Returns `false` for malformed signatures as well as for mismatches.
pub fn verify(
    verifying_key: &VerifyingKey,
    purpose: &str,
    message: &[u8],
    signature: &[u8],
) -> bool {
    let signature_bytes: [u8; SIGNATURE_LEN] = match signature.try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!(len = signature.len(), "Rejecting signature with bad length");
            return false;
        }
    };
    let signature = Signature::from_bytes(&signature_bytes);
    let labelled = build_domain_label(purpose, message);

    match verifying_key.verify_strict(&labelled, &signature) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Signature verification failed: {}", e);
            false
        }
    }
}
