//! Fingerprints and node addresses.
//!
//! A fingerprint is computed as:
//! ```text
//! hash    = BLAKE3("LOCATOR-v1.KEY-DIGEST." || len || public_key)
//! address = hash[0..5]
//! ```
//!
//! Binary form is `address (5 bytes) || hash (32 bytes)`; the string form is
//! `<10 hex digit address>-<64 hex digit hash>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use locator_core::{Error, Result};
use locator_crypto::{key_digest, KEY_DIGEST_LEN};

/// 40-bit node address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(u64);

impl Address {
    /// Encoded length in bytes.
    pub const LEN: usize = 5;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::invalid(format!(
                "address must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        Ok(Self(
            bytes
                .iter()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        ))
    }

    pub fn to_bytes(self) -> [u8; Self::LEN] {
        let be = self.0.to_be_bytes();
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(&be[8 - Self::LEN..]);
        out
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Addresses beginning with `0x00` or `0xff` are reserved.
    pub fn is_reserved(self) -> bool {
        let top = (self.0 >> 32) as u8;
        top == 0x00 || top == 0xff
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != Self::LEN * 2 {
            return Err(Error::invalid(format!("malformed address: {:?}", s)));
        }
        let bytes = hex::decode(s).map_err(|e| Error::invalid(format!("address hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

/// Condensed digest uniquely naming a node's public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    address: Address,
    hash: [u8; KEY_DIGEST_LEN],
}

impl Fingerprint {
    /// Encoded length in bytes.
    pub const LEN: usize = Address::LEN + KEY_DIGEST_LEN;

    /// Derives the fingerprint of an Ed25519 public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self::from_hash(key_digest(public_key))
    }

    fn from_hash(hash: [u8; KEY_DIGEST_LEN]) -> Self {
        let mut address = 0u64;
        for b in &hash[..Address::LEN] {
            address = (address << 8) | u64::from(*b);
        }
        Self {
            address: Address(address),
            hash,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn hash(&self) -> &[u8; KEY_DIGEST_LEN] {
        &self.hash
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..Address::LEN].copy_from_slice(&self.address.to_bytes());
        out[Address::LEN..].copy_from_slice(&self.hash);
        out
    }

    /// Decodes the binary form, rejecting an address that does not match
    /// the hash it claims to be cut from.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::invalid(format!(
                "fingerprint must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let address = Address::from_bytes(&bytes[..Address::LEN])?;
        let mut hash = [0u8; KEY_DIGEST_LEN];
        hash.copy_from_slice(&bytes[Address::LEN..]);

        let fingerprint = Self::from_hash(hash);
        if fingerprint.address != address {
            return Err(Error::invalid(format!(
                "fingerprint address {} does not match its hash",
                address
            )));
        }
        Ok(fingerprint)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.address, hex::encode(self.hash))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (address, hash) = s
            .split_once('-')
            .ok_or_else(|| Error::invalid(format!("malformed fingerprint: {:?}", s)))?;
        let address: Address = address.parse()?;
        let hash = hex::decode(hash).map_err(|e| Error::invalid(format!("fingerprint hex: {}", e)))?;

        let mut bytes = Vec::with_capacity(Self::LEN);
        bytes.extend_from_slice(&address.to_bytes());
        bytes.extend_from_slice(&hash);
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
