//! Identity types and management

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use zeroize::Zeroizing;

use locator_core::{Error, Result};
use locator_crypto::{
    parse_verifying_key, verify, KeyPair, SigningError, PUBLIC_KEY_LEN, SECRET_KEY_LEN,
    SIGNATURE_LEN,
};

use crate::fingerprint::{Address, Fingerprint};

/// Identity type tag written in the string form. Only Ed25519 exists.
const IDENTITY_TYPE_ED25519: &str = "0";

/// A node's keypair, possibly public-only.
///
/// String form: `<address>:0:<hex public key>[:<hex secret key>]`.
/// `Display` and `Serialize` only ever emit the public form.
///
/// The Ed25519 verifying key is decompressed on first use and cached, so a
/// public-only identity parsed from text costs nothing until it verifies.
#[derive(Clone)]
pub struct Identity {
    public_key: [u8; PUBLIC_KEY_LEN],
    keypair: Option<KeyPair>,
    fingerprint: Fingerprint,
    verifying_key: OnceLock<Option<VerifyingKey>>,
}

impl Identity {
    /// Generates a fresh signing identity.
    ///
    /// Keys whose address falls in a reserved range are discarded.
    pub fn generate() -> Self {
        loop {
            let keypair = KeyPair::generate();
            let public_key = keypair.public_key();
            let fingerprint = Fingerprint::from_public_key(&public_key);
            if fingerprint.address().is_reserved() {
                continue;
            }
            tracing::debug!(address = %fingerprint.address(), "Generated identity");
            return Self {
                public_key,
                keypair: Some(keypair),
                fingerprint,
                verifying_key: OnceLock::new(),
            };
        }
    }

    /// Builds a verification-only identity from raw public key bytes.
    pub fn from_public_key(public_key: &[u8]) -> Result<Self> {
        let public_key: [u8; PUBLIC_KEY_LEN] = public_key.try_into().map_err(|_| {
            Error::invalid(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LEN,
                public_key.len()
            ))
        })?;
        let fingerprint = Fingerprint::from_public_key(&public_key);
        if fingerprint.address().is_reserved() {
            return Err(Error::invalid(format!(
                "identity address {} is reserved",
                fingerprint.address()
            )));
        }
        Ok(Self {
            public_key,
            keypair: None,
            fingerprint,
            verifying_key: OnceLock::new(),
        })
    }

    /// Restores a signing identity from its 32-byte secret seed.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Self> {
        let keypair = KeyPair::from_secret_bytes(secret_key)?;
        let mut identity = Self::from_public_key(&keypair.public_key())?;
        identity.keypair = Some(keypair);
        Ok(identity)
    }

    /// Copy of this identity without its private key.
    pub fn to_public(&self) -> Self {
        Self {
            public_key: self.public_key,
            keypair: None,
            fingerprint: self.fingerprint,
            verifying_key: self.verifying_key.clone(),
        }
    }

    /// Whether this identity holds a private key.
    pub fn has_private(&self) -> bool {
        self.keypair.is_some()
    }

    pub fn address(&self) -> Address {
        self.fingerprint.address()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    fn verifying_key(&self) -> Option<&VerifyingKey> {
        self.verifying_key
            .get_or_init(|| match parse_verifying_key(&self.public_key) {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!(address = %self.address(), "Unusable public key: {}", e);
                    None
                }
            })
            .as_ref()
    }

    /// Signs `message` under a domain separation purpose.
    pub fn sign(&self, purpose: &str, message: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or(SigningError::MissingPrivateKey)?;
        Ok(keypair.sign(purpose, message))
    }

    /// Verifies a signature made by this identity. Never fails.
    pub fn verify(&self, purpose: &str, message: &[u8], signature: &[u8]) -> bool {
        match self.verifying_key() {
            Some(key) => verify(key, purpose, message, signature),
            None => false,
        }
    }

    /// Public string form.
    pub fn to_public_string(&self) -> String {
        format!(
            "{}:{}:{}",
            self.address(),
            IDENTITY_TYPE_ED25519,
            hex::encode(self.public_key)
        )
    }

    /// Full string form including the secret key, if present.
    pub fn to_secret_string(&self) -> Option<Zeroizing<String>> {
        self.keypair.as_ref().map(|keypair| {
            let secret = keypair.secret_bytes();
            Zeroizing::new(format!(
                "{}:{}",
                self.to_public_string(),
                hex::encode(&secret[..])
            ))
        })
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.public_key.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_public_string())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address())
            .field("has_private", &self.has_private())
            .finish()
    }
}

impl FromStr for Identity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(Error::invalid("malformed identity string"));
        }
        if parts[1] != IDENTITY_TYPE_ED25519 {
            return Err(Error::invalid(format!(
                "unsupported identity type {:?}",
                parts[1]
            )));
        }
        let address: Address = parts[0].parse()?;

        let public_key = hex::decode(parts[2])
            .map_err(|e| Error::invalid(format!("identity public key hex: {}", e)))?;

        let identity = match parts.get(3) {
            Some(secret_hex) => {
                let secret = Zeroizing::new(
                    hex::decode(secret_hex)
                        .map_err(|e| Error::invalid(format!("identity secret key hex: {}", e)))?,
                );
                if secret.len() != SECRET_KEY_LEN {
                    return Err(Error::invalid("identity secret key has wrong length"));
                }
                let identity = Self::from_secret_key(&secret)?;
                if identity.public_key[..] != public_key[..] {
                    return Err(Error::invalid(
                        "identity secret key does not match its public key",
                    ));
                }
                identity
            }
            None => Self::from_public_key(&public_key)?,
        };

        if identity.address() != address {
            return Err(Error::invalid(format!(
                "identity address {} does not match its public key",
                address
            )));
        }
        Ok(identity)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_public_string())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
