// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Host Invariants
//!
//! Business rules that decide whether a normalized host name may exist at all
//! and which addresses it may carry. All functions are pure (no I/O, no
//! clock); lookups are done by the caller and passed in.
//!
//! # Invariant Categories
//!
//! 1. **Structural**: the name is deep enough below its effective suffix
//! 2. **Classification**: subordinate hosts need glue, external hosts refuse it
//! 3. **Address grammar**: every literal matches its declared version

use std::net::IpAddr;

use crate::domain::hostname::HostName;
use crate::domain::network::{parse_addresses, DeclaredAddress};
use crate::domain::registered_domain::Domain;
use crate::errors::{FlowError, FlowResult};

/// Labels a host name needs below its effective suffix: one for the
/// registrable domain and one for the host itself.
pub const MIN_LABELS_BELOW_SUFFIX: usize = 2;

/// Relationship of a host name to the domains the registry manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not under any managed zone
    External,
    /// Under an active domain of a managed zone
    Subordinate(Domain),
}

impl Classification {
    pub fn superordinate(&self) -> Option<&Domain> {
        match self {
            Classification::External => None,
            Classification::Subordinate(domain) => Some(domain),
        }
    }

    pub fn is_subordinate(&self) -> bool {
        matches!(self, Classification::Subordinate(_))
    }
}

fn label_count(suffix: &str) -> usize {
    suffix.split('.').count()
}

/// Validate that a host name is deep enough to be a host
///
/// The effective suffix is the longest of the matching public suffix, the
/// longest matching managed zone, and the final label. The name needs
/// [`MIN_LABELS_BELOW_SUFFIX`] labels below it.
///
/// # Rules
/// - `com`, `co.uk`: bare public suffixes
/// - `example.lol`, `foo.co.uk`: registrable domains, not hosts
/// - `ns1.bar.tld` when `bar.tld` is managed: a domain under `bar.tld`
pub fn validate_host_depth(
    name: &HostName,
    public_suffix: Option<&str>,
    managed_zone: Option<&str>,
) -> FlowResult<()> {
    let effective = [public_suffix, managed_zone]
        .into_iter()
        .flatten()
        .map(label_count)
        .max()
        .unwrap_or(1)
        .max(1);

    if name.label_count() < effective + MIN_LABELS_BELOW_SUFFIX {
        return Err(FlowError::HostNameTooShallow);
    }
    Ok(())
}

/// Parse declared addresses and enforce the classification rules
///
/// Address grammar is checked first so a malformed or mistagged literal is
/// reported as such regardless of the host's classification.
///
/// # Rules
/// - Every literal matches the grammar of its declared version
/// - Subordinate hosts declare at least one address
/// - External hosts declare none
pub fn enforce_ip_constraints(
    classification: &Classification,
    declared: &[DeclaredAddress],
) -> FlowResult<Vec<IpAddr>> {
    let addresses = parse_addresses(declared)?;

    match classification {
        Classification::Subordinate(_) if addresses.is_empty() => {
            Err(FlowError::SubordinateHostMustHaveIp)
        }
        Classification::External if !addresses.is_empty() => {
            Err(FlowError::UnexpectedExternalHostIp)
        }
        _ => Ok(addresses),
    }
}
