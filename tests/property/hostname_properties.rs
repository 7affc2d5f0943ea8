// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Host Name Normalization
//!
//! Normalization must be idempotent, and a name the validator accepts must
//! come back unchanged.

use host_registry::domain::{canonical_form, HostName};
use host_registry::FlowError;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Label over mixed-case ASCII, digits, interior hyphens and a few
/// non-ASCII letters
fn label() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9çéüみ]([a-zA-Z0-9çéüみ-]{0,8}[a-zA-Z0-9çéüみ])?"
}

/// Labels joined by dots, possibly with stray leading, doubled or trailing dots
fn raw_name() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(label(), 1..6),
        prop::bool::ANY,
        prop::bool::ANY,
    )
        .prop_map(|(labels, doubled, trailing)| {
            let separator = if doubled { ".." } else { "." };
            let mut name = labels.join(separator);
            if trailing {
                name.push('.');
            }
            name
        })
}

/// Already canonical ASCII names
fn canonical_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]([a-z0-9-]{0,10}[a-z0-9])?", 2..6)
        .prop_map(|labels| labels.join("."))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: canonical_form(canonical_form(x)) == canonical_form(x)
    #[test]
    fn prop_canonical_form_is_idempotent(raw in raw_name()) {
        if let Some(canonical) = canonical_form(&raw) {
            prop_assert_eq!(canonical_form(&canonical), Some(canonical.clone()));
        }
    }

    /// Property: a canonical name the validator accepts is returned unchanged
    #[test]
    fn prop_parse_is_fixed_point_on_canonical_form(raw in raw_name()) {
        if let Some(canonical) = canonical_form(&raw) {
            if let Ok(name) = HostName::parse(&canonical) {
                prop_assert_eq!(name.as_str(), canonical.as_str());
            }
        }
    }

    /// Property: anything the validator accepts is already canonical
    #[test]
    fn prop_accepted_names_are_canonical(raw in raw_name()) {
        if let Ok(name) = HostName::parse(&raw) {
            prop_assert_eq!(name.as_str(), raw.as_str());
            prop_assert_eq!(canonical_form(&raw), Some(raw.clone()));
        }
    }

    /// Property: short lowercase LDH names always parse
    #[test]
    fn prop_canonical_ascii_names_parse(raw in canonical_name()) {
        prop_assume!(!raw.split('.').any(|label| label.starts_with("xn--")));
        let name = HostName::parse(&raw);
        prop_assert!(name.is_ok());
        prop_assert_eq!(name.map(|n| n.label_count()).ok(), Some(raw.split('.').count()));
    }

    /// Property: a name with any uppercase ASCII letter is never accepted as is
    #[test]
    fn prop_uppercase_is_reported_with_lowercase_expectation(
        raw in canonical_name(),
        index in any::<prop::sample::Index>(),
    ) {
        let letters: Vec<usize> = raw
            .char_indices()
            .filter(|(_, c)| c.is_ascii_lowercase())
            .map(|(i, _)| i)
            .collect();
        prop_assume!(!letters.is_empty());
        let at = letters[index.index(letters.len())];
        let mut shouted = raw.clone();
        shouted.replace_range(at..at + 1, &raw[at..at + 1].to_ascii_uppercase());

        prop_assert_eq!(
            HostName::parse(&shouted),
            Err(FlowError::HostNameNotLowerCase { expected: raw.clone() })
        );
    }
}
