//! Locator Mesh - signed reachability records for overlay address resolution.
//!
//! A node publishes "here is where I can be reached, as of time T" as a
//! [`Locator`]: its fingerprint, a timestamp and an ordered list of
//! [`Endpoint`]s under its Ed25519 signature. Any node holding the
//! publisher's public identity can authenticate it offline.
//!
//! # Core Components
//!
//! - **Endpoint**: transport plus address (UDP, TCP, HTTP, Ethernet, relay via another node)
//! - **Locator**: the signed record, with binary, canonical string and JSON forms
//! - **Wire codec**: bounded big-endian reader/writer shared by both
//!
//! # Example Usage
//!
//! ```rust
//! use locator_identity::Identity;
//! use locator_mesh::{Endpoint, Locator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::generate();
//! let endpoints = vec!["udp/192.168.1.100:9993".parse::<Endpoint>()?];
//!
//! let locator = Locator::create(1_700_000_000_000, &endpoints, Some(&identity))?;
//!
//! // Ship the string out of band, parse it on the other side.
//! let received: Locator = locator.canonical_string().parse()?;
//! assert!(received.validate(Some(&identity.to_public())));
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod locator;
pub mod wire;

#[cfg(test)]
mod proptests;

// Re-export main types
pub use endpoint::{Endpoint, MacAddress};
pub use locator::Locator;
pub use locator_core::{Error, Result};
