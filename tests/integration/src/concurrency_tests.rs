//! Shared read-only use of locators and identities across threads.

use std::sync::Arc;
use std::thread;

use locator_mesh::Locator;

use crate::test_utils::{current_timestamp_ms, TestNode};

#[test]
fn test_shared_locator_validates_from_many_threads() {
    let node = TestNode::new(20);
    let locator = Arc::new(node.publish(current_timestamp_ms()));
    // Verifying key is materialized lazily; every thread races on first use.
    let identity = Arc::new(node.public_identity());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let locator = Arc::clone(&locator);
            let identity = Arc::clone(&identity);
            thread::spawn(move || {
                let bytes = locator.to_bytes();
                let reparsed = Locator::from_bytes(&bytes).unwrap();
                locator.validate(Some(&identity)) && reparsed.validate(Some(&identity))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_signing_identity_shared_across_threads() {
    let node = Arc::new(TestNode::new(21));
    let base = current_timestamp_ms();

    let locators: Vec<Locator> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let node = Arc::clone(&node);
                s.spawn(move || node.publish(base + i))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, locator) in locators.iter().enumerate() {
        assert_eq!(locator.timestamp(), base + i as i64);
        assert!(locator.validate(Some(&node.identity)));
    }
}
