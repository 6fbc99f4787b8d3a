//! Locator exchange between nodes
//!
//! A publisher signs its endpoints; a peer that only knows the publisher's
//! public identity receives the record in one of the three encodings and
//! authenticates it.

use crate::test_utils::{current_timestamp_ms, init_test_logging, TestNode};
use locator_mesh::Locator;

#[test]
fn test_exchange_via_canonical_string() {
    init_test_logging();
    let publisher = TestNode::new(1);
    let locator = publisher.publish(current_timestamp_ms());

    let wire = locator.canonical_string().to_string();
    let received = Locator::from_string(&wire).unwrap();

    assert!(received.validate(Some(&publisher.public_identity())));
    assert_eq!(received.endpoints(), &publisher.endpoints[..]);
    assert_eq!(received.fingerprint(), publisher.identity.fingerprint());
}

#[test]
fn test_exchange_via_binary() {
    let publisher = TestNode::new(2);
    let locator = publisher.publish(current_timestamp_ms());

    let received = Locator::from_bytes(&locator.to_bytes()).unwrap();

    assert!(received.validate(Some(&publisher.public_identity())));
    assert_eq!(received.timestamp(), locator.timestamp());
    assert_eq!(received.canonical_string(), locator.canonical_string());
}

#[test]
fn test_exchange_via_json() {
    let publisher = TestNode::new(3);
    let locator = publisher.publish(current_timestamp_ms());

    let json = serde_json::to_string(&locator).unwrap();
    let received: Locator = serde_json::from_str(&json).unwrap();

    assert!(received.validate(Some(&publisher.public_identity())));
    assert_eq!(received, locator);
}

#[test]
fn test_string_and_binary_views_agree() {
    let publisher = TestNode::new(4);
    let locator = publisher.publish(current_timestamp_ms());

    let from_string = Locator::from_string(locator.canonical_string()).unwrap();
    let from_bytes = Locator::from_bytes(&locator.to_bytes()).unwrap();

    assert_eq!(from_string.to_bytes(), from_bytes.to_bytes());
    assert_eq!(from_string, from_bytes);
}

#[test]
fn test_newer_locator_carries_later_timestamp() {
    let publisher = TestNode::new(5);
    let now = current_timestamp_ms();
    let older = publisher.publish(now);
    let newer = publisher.publish(now + 60_000);

    assert!(newer.timestamp() > older.timestamp());
    assert_ne!(newer.canonical_string(), older.canonical_string());
    assert!(older.validate(Some(&publisher.identity)));
    assert!(newer.validate(Some(&publisher.identity)));
}

#[test]
fn test_peer_validates_only_its_publisher() {
    let alice = TestNode::new(6);
    let bob = TestNode::new(7);
    let alice_locator = alice.publish(current_timestamp_ms());
    let bob_locator = bob.publish(current_timestamp_ms());

    assert!(alice_locator.validate(Some(&alice.public_identity())));
    assert!(!alice_locator.validate(Some(&bob.public_identity())));
    assert!(bob_locator.validate(Some(&bob.public_identity())));
    assert!(!bob_locator.validate(Some(&alice.public_identity())));
}
