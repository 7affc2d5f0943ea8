// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Host Create Flow
//!
//! Drives the async flow from proptest with `tokio_test::block_on`.

use host_registry::domain::DeclaredAddress;
use host_registry::{CreateHostCommand, HostCreateService};
use proptest::prelude::*;

use crate::fixtures::{context, Registry};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every committed subordinate host is in its domain's set and
    /// queued for refresh exactly once
    #[test]
    fn prop_subordinate_hosts_are_linked(
        hosts in prop::collection::btree_set("[a-z][a-z0-9]{0,5}", 1..6),
    ) {
        let registry = Registry::standard();

        for host in &hosts {
            let command = CreateHostCommand::new(format!("{}.example.tld", host))
                .with_address(DeclaredAddress::v4("192.0.2.53"));
            let result = tokio_test::block_on(registry.flow.create_host(&context(), command));
            prop_assert!(result.is_ok());
        }

        let subordinates = registry.domain("example.tld").subordinate_hosts;
        let expected: Vec<String> = hosts.iter().map(|h| format!("{}.example.tld", h)).collect();
        prop_assert_eq!(subordinates.into_iter().collect::<Vec<_>>(), expected.clone());

        let mut queued = registry.queued_refreshes();
        queued.sort();
        prop_assert_eq!(queued, expected);
    }

    /// Property: an external host never touches the DNS queue
    #[test]
    fn prop_external_hosts_are_not_queued(host in "[a-z][a-z0-9]{0,5}", zone in "[a-z]{3,6}") {
        prop_assume!(zone != "tld");
        let registry = Registry::standard();
        let command = CreateHostCommand::new(format!("ns.{}.{}", host, zone));

        let response = tokio_test::block_on(registry.flow.create_host(&context(), command));

        prop_assert!(response.is_ok());
        prop_assert!(registry.queued_refreshes().is_empty());
    }
}
