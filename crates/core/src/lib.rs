//! Core functionality shared by the locator workspace.
//!
//! This crate provides the error taxonomy, the hard encoding limits, the
//! logging bootstrap and the TOML configuration model used by the other
//! crates and by the `locator-cli` binary.

pub mod config;
pub mod error;
pub mod limits;
pub mod logging;

pub use config::{Config, IdentityConfig, LocatorConfig, LoggingConfig};
pub use error::{Error, Result};
pub use limits::{LOCATOR_VERSION, MAX_ENDPOINTS, MAX_MARSHAL_SIZE, MAX_STRING_SIZE};
