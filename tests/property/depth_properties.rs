// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Depth Rule
//!
//! A name is deep enough exactly when it has at least two labels below the
//! longest of its public suffix, its managed zone and its final label.

use host_registry::domain::{validate_host_depth, HostName};
use host_registry::FlowError;
use proptest::prelude::*;

fn labels(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9]{0,6}", range)
}

proptest! {
    /// Property: depth is decided by the longer of the two suffix sources
    #[test]
    fn prop_depth_rule_for_any_suffix_length(
        suffix in labels(1..5),
        below in labels(0..4),
        shorter_by in 0usize..4,
        suffix_is_public in prop::bool::ANY,
    ) {
        let name = below
            .iter()
            .chain(suffix.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(".");
        let name = HostName::parse(&name).unwrap();

        let effective = suffix.join(".");
        let shorter_len = suffix.len().saturating_sub(shorter_by).max(1);
        let shorter = suffix[suffix.len() - shorter_len..].join(".");

        let (public, managed) = if suffix_is_public {
            (Some(effective.as_str()), Some(shorter.as_str()))
        } else {
            (Some(shorter.as_str()), Some(effective.as_str()))
        };

        let result = validate_host_depth(&name, public, managed);
        if below.len() >= 2 {
            prop_assert_eq!(result, Ok(()));
        } else {
            prop_assert_eq!(result, Err(FlowError::HostNameTooShallow));
        }
    }

    /// Property: without suffix information the final label is the suffix
    #[test]
    fn prop_unlisted_tld_needs_three_labels(all in labels(1..6)) {
        let name = HostName::parse(&all.join(".")).unwrap();
        let result = validate_host_depth(&name, None, None);
        prop_assert_eq!(result.is_ok(), all.len() >= 3);
    }
}
