//! Test utilities for cross-crate integration tests

use locator_identity::Identity;
use locator_mesh::{Endpoint, Locator};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// Install a test subscriber so library debug logs show up with `--nocapture`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Test fixture for a node publishing its reachability
pub struct TestNode {
    pub identity: Identity,
    pub endpoints: Vec<Endpoint>,
}

impl TestNode {
    /// Create a node with a fresh identity and a UDP + TCP endpoint pair
    pub fn new(octet: u8) -> Self {
        let endpoints = vec![
            format!("udp/10.0.0.{}:9993", octet).parse().unwrap(),
            format!("tcp/10.0.0.{}:443", octet).parse().unwrap(),
        ];
        Self {
            identity: Identity::generate(),
            endpoints,
        }
    }

    /// Sign a locator for this node's endpoints
    pub fn publish(&self, timestamp: i64) -> Locator {
        Locator::create(timestamp, &self.endpoints, Some(&self.identity)).unwrap()
    }

    /// The identity another node would learn through its own channel
    pub fn public_identity(&self) -> Identity {
        self.identity.to_public_string().parse().unwrap()
    }
}
