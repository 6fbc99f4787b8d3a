//! Property-based tests for locator encodings.
//!
//! - Binary and string forms decode back to the same record
//! - The signer always validates, a stranger never does
//! - Arbitrary bytes and strings never panic the decoders

use proptest::prelude::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use locator_core::MAX_ENDPOINTS;
use locator_identity::{Fingerprint, Identity};

use crate::endpoint::{Endpoint, MacAddress};
use crate::locator::Locator;

fn arb_socket_addr() -> impl Strategy<Value = SocketAddr> {
    prop_oneof![
        (any::<[u8; 4]>(), any::<u16>())
            .prop_map(|(ip, port)| SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), port)),
        (any::<[u8; 16]>(), any::<u16>())
            .prop_map(|(ip, port)| SocketAddr::new(IpAddr::V6(Ipv6Addr::from(ip)), port)),
    ]
}

fn arb_endpoint() -> impl Strategy<Value = Endpoint> {
    prop_oneof![
        arb_socket_addr().prop_map(Endpoint::IpUdp),
        arb_socket_addr().prop_map(Endpoint::IpTcp),
        arb_socket_addr().prop_map(Endpoint::IpHttp),
        any::<[u8; 32]>().prop_map(|pk| Endpoint::Overlay(Fingerprint::from_public_key(&pk))),
        any::<[u8; 6]>().prop_map(|b| Endpoint::Ethernet(MacAddress::new(b))),
        any::<[u8; 6]>().prop_map(|b| Endpoint::WifiDirect(MacAddress::new(b))),
        any::<[u8; 6]>().prop_map(|b| Endpoint::Bluetooth(MacAddress::new(b))),
    ]
}

fn arb_endpoints() -> impl Strategy<Value = Vec<Endpoint>> {
    prop::collection::hash_set(arb_endpoint(), 1..=MAX_ENDPOINTS)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every signed locator survives both encodings unchanged and validates.
    #[test]
    fn encodings_round_trip(
        timestamp in 1i64..=i64::MAX,
        endpoints in arb_endpoints(),
    ) {
        let identity = Identity::generate();
        let locator = Locator::create(timestamp, &endpoints, Some(&identity)).unwrap();

        let from_bytes = Locator::from_bytes(&locator.to_bytes()).unwrap();
        prop_assert_eq!(&from_bytes, &locator);

        let from_string = Locator::from_string(locator.canonical_string()).unwrap();
        prop_assert_eq!(from_string.to_bytes(), locator.to_bytes());

        prop_assert_eq!(locator.endpoints(), &endpoints[..]);
        prop_assert!(from_string.validate(Some(&identity)));
        prop_assert!(!from_string.validate(Some(&Identity::generate())));
    }

    /// The decoder rejects or accepts arbitrary input without panicking.
    #[test]
    fn decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Locator::from_bytes(&bytes);
    }

    /// Same for the string form, both free text and canonical-looking input.
    #[test]
    fn string_decoder_never_panics(
        text in ".{0,256}",
        shaped in "[0-9a-f]{10}@[A-Za-z0-9_-]{0,400}",
    ) {
        let _ = Locator::from_string(&text);
        let _ = Locator::from_string(&shaped);
    }
}
