//! Node identities for the locator system.
//!
//! An [`Identity`] is an Ed25519 key pair, possibly public-only. Its
//! [`Fingerprint`] is the condensed digest other nodes use to name it, and
//! the leading 40 bits of that digest form the node [`Address`].
//!
//! # Core Concepts
//!
//! - **Identity**: signing-capable when it holds a private key, verification-only otherwise
//! - **Fingerprint**: always derived from the public key, never supplied independently
//! - **Address**: short routable name cut from the fingerprint

pub mod fingerprint;
pub mod identity;

pub use fingerprint::{Address, Fingerprint};
pub use identity::Identity;

// Re-export core types for convenience
pub use locator_core::{Error, Result};
