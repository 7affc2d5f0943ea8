// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Declared Addresses

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use host_registry::domain::{parse_addresses, DeclaredAddress};
use host_registry::FlowError;
use proptest::prelude::*;

proptest! {
    /// Property: parsing keeps the first occurrence of each address, in order
    #[test]
    fn prop_duplicates_collapse_to_first_occurrence(octets in prop::collection::vec(0u8..4, 0..12)) {
        let declared: Vec<_> = octets
            .iter()
            .map(|o| DeclaredAddress::v4(format!("192.0.2.{}", o)))
            .collect();

        let mut expected: Vec<IpAddr> = Vec::new();
        for o in &octets {
            let address = IpAddr::V4(Ipv4Addr::new(192, 0, 2, *o));
            if !expected.contains(&address) {
                expected.push(address);
            }
        }

        prop_assert_eq!(parse_addresses(&declared), Ok(expected));
    }

    /// Property: any v4 literal declared as v6 is a version mismatch
    #[test]
    fn prop_v4_literal_tagged_v6_mismatches(address in any::<Ipv4Addr>()) {
        let literal = address.to_string();
        prop_assert_eq!(
            DeclaredAddress::v6(literal.clone()).parse(),
            Err(FlowError::IpAddressVersionMismatch { literal })
        );
    }

    /// Property: any v6 address round-trips under its own declaration
    #[test]
    fn prop_v6_literal_parses_under_v6(address in any::<Ipv6Addr>()) {
        prop_assert_eq!(
            DeclaredAddress::v6(address.to_string()).parse(),
            Ok(IpAddr::V6(address))
        );
    }
}
