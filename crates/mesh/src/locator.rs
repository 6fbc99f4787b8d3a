//! Signed locators.
//!
//! A [`Locator`] binds a node's [`Fingerprint`] to the endpoints at which it
//! can currently be reached, as of a timestamp, under the node's signature.
//!
//! # Binary layout (version 1, big-endian)
//!
//! ```text
//! u8        version            = 0x01
//! i64       timestamp          > 0
//! [u8; 37]  signer fingerprint (address || key digest)
//! u16       endpoint count     1..=8
//! Endpoint  x count
//! u16       signature length   = 64
//! [u8; 64]  Ed25519 signature over every byte before the length field
//! ```
//!
//! # Canonical string
//!
//! ```text
//! <10 hex digit address>@<base64url, unpadded, of the binary form>
//! ```
//!
//! Both encodings are capped at 4096 bytes; a record that would exceed them
//! cannot be built, and encoders fail rather than truncate.
//!
//! # JSON
//!
//! The JSON form carries `timestamp`, `fingerprint`, `endpoints` and
//! `canonicalString`. Only `canonicalString` is read back; the other fields
//! exist for humans and are never trusted.
//!
//! # Lifecycle
//!
//! Every constructor ([`Locator::create`], [`Locator::from_bytes`],
//! [`Locator::from_string`]) either returns a complete record or an error.
//! Records are immutable: there are no setters, and re-decoding JSON yields
//! a new value.

use base64::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use locator_core::{Error, Result, LOCATOR_VERSION, MAX_ENDPOINTS, MAX_MARSHAL_SIZE, MAX_STRING_SIZE};
use locator_crypto::{purposes, SIGNATURE_LEN};
use locator_identity::{Address, Fingerprint, Identity};

use crate::endpoint::Endpoint;
use crate::wire::{WireReader, WireWriter};

/// Signed, timestamped set of endpoints for one identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Locator {
    timestamp: i64,
    fingerprint: Fingerprint,
    endpoints: Vec<Endpoint>,
    signature: [u8; SIGNATURE_LEN],
    canonical: String,
}

impl Locator {
    /// Signs a new locator.
    ///
    /// # Errors
    /// `InvalidParameter` if `timestamp <= 0`, `endpoints` is empty, holds
    /// duplicates or more than [`MAX_ENDPOINTS`] entries, `signer` is missing
    /// or has no private key, or the record would not fit the encoding
    /// limits.
    pub fn create(
        timestamp: i64,
        endpoints: &[Endpoint],
        signer: Option<&Identity>,
    ) -> Result<Self> {
        let signer = signer.ok_or_else(|| Error::invalid("missing signing identity"))?;
        if timestamp <= 0 {
            return Err(Error::invalid(format!(
                "timestamp must be positive, got {}",
                timestamp
            )));
        }
        check_endpoints(endpoints)?;
        if !signer.has_private() {
            return Err(Error::invalid("signing identity has no private key"));
        }

        let mut staging = [0u8; MAX_MARSHAL_SIZE];
        let mut w = WireWriter::new(&mut staging);
        marshal_payload(&mut w, timestamp, signer.fingerprint(), endpoints)?;
        let signature = signer.sign(purposes::LOCATOR_SIG, w.written())?;
        w.put_u16(SIGNATURE_LEN as u16)?;
        w.put_bytes(&signature)?;

        // The signed record goes through the same decoder as received ones.
        let locator = Self::from_bytes(w.written()).map_err(|e| {
            Error::internal(format!("freshly signed locator does not decode: {}", e))
        })?;
        if locator.fingerprint != *signer.fingerprint() {
            return Err(Error::internal(
                "decoded fingerprint differs from the signer's",
            ));
        }

        tracing::debug!(
            address = %locator.address(),
            timestamp,
            endpoints = locator.endpoints.len(),
            "Signed locator"
        );
        Ok(locator)
    }

    /// Decodes the binary form.
    ///
    /// Decoding proves well-formedness only. Call [`Locator::validate`] to
    /// authenticate the record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::invalid("empty locator buffer"));
        }
        if bytes.len() > MAX_MARSHAL_SIZE {
            return Err(Error::invalid(format!(
                "locator of {} bytes exceeds {} byte limit",
                bytes.len(),
                MAX_MARSHAL_SIZE
            )));
        }

        let mut r = WireReader::new(bytes);
        let version = r.get_u8()?;
        if version != LOCATOR_VERSION {
            return Err(Error::invalid(format!(
                "unsupported locator version {}",
                version
            )));
        }

        let timestamp = r.get_i64()?;
        if timestamp <= 0 {
            return Err(Error::invalid(format!(
                "timestamp must be positive, got {}",
                timestamp
            )));
        }

        let fingerprint = Fingerprint::from_bytes(r.take(Fingerprint::LEN)?)?;

        let count = usize::from(r.get_u16()?);
        if count == 0 || count > MAX_ENDPOINTS {
            return Err(Error::invalid(format!(
                "endpoint count {} outside 1..={}",
                count, MAX_ENDPOINTS
            )));
        }
        let mut endpoints = Vec::with_capacity(count);
        for _ in 0..count {
            endpoints.push(Endpoint::unmarshal(&mut r)?);
        }
        check_endpoints(&endpoints)?;

        let signature_len = usize::from(r.get_u16()?);
        if signature_len != SIGNATURE_LEN {
            return Err(Error::invalid(format!(
                "signature length {} (expected {})",
                signature_len, SIGNATURE_LEN
            )));
        }
        let signature = r.take_array::<SIGNATURE_LEN>()?;

        if r.remaining() != 0 {
            return Err(Error::invalid(format!(
                "{} trailing bytes after locator",
                r.remaining()
            )));
        }

        let canonical = canonical_string(fingerprint.address(), bytes)?;
        tracing::debug!(address = %fingerprint.address(), timestamp, "Decoded locator");

        Ok(Self {
            timestamp,
            fingerprint,
            endpoints,
            signature,
            canonical,
        })
    }

    /// Decodes the canonical string form.
    pub fn from_string(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid("empty locator string"));
        }
        if s.len() > MAX_STRING_SIZE {
            return Err(Error::invalid(format!(
                "locator string of {} bytes exceeds {} byte limit",
                s.len(),
                MAX_STRING_SIZE
            )));
        }

        let (address, encoded) = s
            .split_once('@')
            .ok_or_else(|| Error::invalid("locator string missing '@'"))?;
        let address: Address = address.parse()?;
        let bytes = BASE64_URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| Error::invalid(format!("locator base64: {}", e)))?;

        let locator = Self::from_bytes(&bytes)?;
        if locator.address() != address {
            return Err(Error::invalid(format!(
                "locator string prefix {} does not match signer {}",
                address,
                locator.address()
            )));
        }
        if locator.canonical != s {
            return Err(Error::invalid("locator string is not in canonical form"));
        }
        Ok(locator)
    }

    /// Decodes the JSON projection.
    ///
    /// The record is rebuilt from `canonicalString` alone.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: LocatorPayload = serde_json::from_str(json)
            .map_err(|e| Error::invalid(format!("locator JSON: {}", e)))?;
        payload.into_locator()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks the embedded signature against `identity`.
    ///
    /// Returns `false` when no identity is given, when it is not the signer
    /// named by the locator, or when the signature does not verify.
    pub fn validate(&self, identity: Option<&Identity>) -> bool {
        let identity = match identity {
            Some(identity) => identity,
            None => return false,
        };
        if identity.fingerprint() != &self.fingerprint {
            tracing::debug!(
                locator = %self.address(),
                identity = %identity.address(),
                "Locator signer does not match identity"
            );
            return false;
        }

        let mut staging = [0u8; MAX_MARSHAL_SIZE];
        let mut w = WireWriter::new(&mut staging);
        if let Err(e) = marshal_payload(&mut w, self.timestamp, &self.fingerprint, &self.endpoints)
        {
            tracing::warn!(address = %self.address(), "Cannot re-encode locator payload: {}", e);
            return false;
        }
        identity.verify(purposes::LOCATOR_SIG, w.written(), &self.signature)
    }

    /// Writes the binary form into `buf`, returning the encoded length.
    ///
    /// # Errors
    /// `InvalidParameter` if `buf` is too small; nothing usable is written.
    pub fn marshal_into(&self, buf: &mut [u8]) -> Result<usize> {
        let mut w = WireWriter::new(buf);
        marshal_payload(&mut w, self.timestamp, &self.fingerprint, &self.endpoints)?;
        w.put_u16(SIGNATURE_LEN as u16)?;
        w.put_bytes(&self.signature)?;
        Ok(w.position())
    }

    /// Binary form, or an empty vector if it cannot be encoded within
    /// [`MAX_MARSHAL_SIZE`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut staging = [0u8; MAX_MARSHAL_SIZE];
        match self.marshal_into(&mut staging) {
            Ok(len) => staging[..len].to_vec(),
            Err(e) => {
                tracing::warn!(address = %self.address(), "Cannot encode locator: {}", e);
                Vec::new()
            }
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn address(&self) -> Address {
        self.fingerprint.address()
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn canonical_string(&self) -> &str {
        &self.canonical
    }
}

fn check_endpoints(endpoints: &[Endpoint]) -> Result<()> {
    if endpoints.is_empty() {
        return Err(Error::invalid("locator needs at least one endpoint"));
    }
    if endpoints.len() > MAX_ENDPOINTS {
        return Err(Error::invalid(format!(
            "{} endpoints exceeds limit of {}",
            endpoints.len(),
            MAX_ENDPOINTS
        )));
    }
    let mut seen = HashSet::with_capacity(endpoints.len());
    for endpoint in endpoints {
        endpoint.check_encodable()?;
        if !seen.insert(endpoint) {
            return Err(Error::invalid(format!("duplicate endpoint {}", endpoint)));
        }
    }
    Ok(())
}

fn marshal_payload(
    w: &mut WireWriter<'_>,
    timestamp: i64,
    fingerprint: &Fingerprint,
    endpoints: &[Endpoint],
) -> Result<()> {
    w.put_u8(LOCATOR_VERSION)?;
    w.put_i64(timestamp)?;
    w.put_bytes(&fingerprint.to_bytes())?;
    w.put_u16(endpoints.len() as u16)?;
    for endpoint in endpoints {
        endpoint.marshal(w)?;
    }
    Ok(())
}

fn canonical_string(address: Address, bytes: &[u8]) -> Result<String> {
    let s = format!("{}@{}", address, BASE64_URL_SAFE_NO_PAD.encode(bytes));
    if s.len() > MAX_STRING_SIZE {
        return Err(Error::invalid(format!(
            "locator string of {} bytes exceeds {} byte limit",
            s.len(),
            MAX_STRING_SIZE
        )));
    }
    Ok(s)
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("timestamp", &self.timestamp)
            .field("fingerprint", &self.fingerprint)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl TryFrom<&[u8]> for Locator {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// Outgoing JSON shape.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocatorJsonRef<'a> {
    timestamp: i64,
    fingerprint: &'a Fingerprint,
    endpoints: &'a [Endpoint],
    canonical_string: &'a str,
}

/// Incoming JSON shape. Every other field is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocatorPayload {
    #[serde(default, alias = "string")]
    canonical_string: Option<String>,
}

impl LocatorPayload {
    fn into_locator(self) -> Result<Locator> {
        match self.canonical_string {
            Some(s) if !s.is_empty() => Locator::from_string(&s),
            _ => Err(Error::invalid("locator JSON has no canonicalString")),
        }
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LocatorJsonRef {
            timestamp: self.timestamp,
            fingerprint: &self.fingerprint,
            endpoints: &self.endpoints,
            canonical_string: &self.canonical,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        LocatorPayload::deserialize(deserializer)?
            .into_locator()
            .map_err(serde::de::Error::custom)
    }
}
