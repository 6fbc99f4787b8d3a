//! Forgery and Tampering Scenarios
//!
//! # Test Scenarios
//!
//! 1. **Endpoint hijack**: an attacker rewrites the endpoint list of a genuine record
//! 2. **Re-signing**: an attacker signs the victim's payload with its own key
//! 3. **JSON side channel**: auxiliary JSON fields disagree with the signed string
//! 4. **Malformed input**: empty and truncated inputs are parameter errors
//!
//! # Expected Outcomes
//!
//! - Tampered records either fail to decode or decode but never validate
//! - Decoding JSON only ever reflects the signed canonical string

use base64::prelude::*;
use locator_core::Error;
use locator_crypto::{purposes, SIGNATURE_LEN};
use locator_identity::Identity;
use locator_mesh::{Endpoint, Locator};

use crate::test_utils::{current_timestamp_ms, TestNode};

/// Byte offset of the first endpoint in a version 1 locator.
const ENDPOINTS_OFFSET: usize = 1 + 8 + 37 + 2;

#[test]
fn test_endpoint_hijack_is_detected() {
    let victim = TestNode::new(10);
    let locator = victim.publish(current_timestamp_ms());
    let mut bytes = locator.to_bytes();

    // First endpoint is udp/10.0.0.10:9993 -> type, family, 4 address bytes.
    assert_eq!(bytes[ENDPOINTS_OFFSET + 5], 10);
    bytes[ENDPOINTS_OFFSET + 5] = 66;

    let hijacked = Locator::from_bytes(&bytes).unwrap();
    assert_eq!(
        hijacked.endpoints()[0],
        "udp/10.0.0.66:9993".parse::<Endpoint>().unwrap()
    );
    assert!(!hijacked.validate(Some(&victim.public_identity())));
}

#[test]
fn test_resigned_payload_does_not_validate_for_victim() {
    let victim = TestNode::new(11);
    let attacker = Identity::generate();
    let locator = victim.publish(current_timestamp_ms());
    let mut bytes = locator.to_bytes();

    let payload_len = bytes.len() - 2 - SIGNATURE_LEN;
    let forged = attacker
        .sign(purposes::LOCATOR_SIG, &bytes[..payload_len])
        .unwrap();
    bytes[payload_len + 2..].copy_from_slice(&forged);

    let decoded = Locator::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.fingerprint(), victim.identity.fingerprint());
    assert!(!decoded.validate(Some(&victim.public_identity())));
    // The attacker is not the named signer either.
    assert!(!decoded.validate(Some(&attacker)));
}

#[test]
fn test_string_with_foreign_payload_is_rejected() {
    let victim = TestNode::new(12);
    let other = TestNode::new(13);
    let victim_locator = victim.publish(current_timestamp_ms());
    let other_locator = other.publish(current_timestamp_ms());

    let spliced = format!(
        "{}@{}",
        victim.identity.address(),
        BASE64_URL_SAFE_NO_PAD.encode(other_locator.to_bytes())
    );
    assert!(Locator::from_string(&spliced).is_err());
    assert!(Locator::from_string(victim_locator.canonical_string()).is_ok());
}

#[test]
fn test_json_auxiliary_fields_are_not_trusted() {
    let victim = TestNode::new(14);
    let attacker = TestNode::new(15);
    let locator = victim.publish(current_timestamp_ms());

    let mut value = serde_json::to_value(&locator).unwrap();
    value["timestamp"] = serde_json::json!(i64::MAX);
    value["fingerprint"] = serde_json::json!(attacker.identity.fingerprint().to_string());
    value["endpoints"] = serde_json::json!(["udp/6.6.6.6:9993"]);

    let decoded = Locator::from_json(&value.to_string()).unwrap();
    assert_eq!(decoded.timestamp(), locator.timestamp());
    assert_eq!(decoded.fingerprint(), victim.identity.fingerprint());
    assert_eq!(decoded.endpoints(), &victim.endpoints[..]);
    assert!(decoded.validate(Some(&victim.public_identity())));
}

#[test]
fn test_json_with_tampered_canonical_string_fails() {
    let victim = TestNode::new(16);
    let locator = victim.publish(current_timestamp_ms());

    let mut value = serde_json::to_value(&locator).unwrap();
    let mut tampered = locator.canonical_string().to_string();
    tampered.push('!');
    value["canonicalString"] = serde_json::json!(tampered);

    let err = Locator::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn test_malformed_inputs_are_parameter_errors() {
    let node = TestNode::new(17);

    assert!(Locator::from_bytes(&[]).unwrap_err().is_invalid_parameter());
    assert!(Locator::from_string("").unwrap_err().is_invalid_parameter());
    assert!(Locator::create(0, &node.endpoints, Some(&node.identity))
        .unwrap_err()
        .is_invalid_parameter());
    assert!(
        Locator::create(current_timestamp_ms(), &[], Some(&node.identity))
            .unwrap_err()
            .is_invalid_parameter()
    );

    let bytes = node.publish(current_timestamp_ms()).to_bytes();
    for cut in 1..bytes.len() {
        let err = Locator::from_bytes(&bytes[..cut]).unwrap_err();
        assert!(err.is_invalid_parameter(), "cut at {}: {}", cut, err);
    }
}
