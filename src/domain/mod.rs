// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry Domain Models
//!
//! Value objects and entities for nameserver registration.
//!
//! # Value Objects with Invariants
//!
//! - [`HostName`] - lowercase, punycoded, normalized host name (≤ 255 octets encoded)
//! - [`DeclaredAddress`] - address literal with its declared IP version
//!
//! # Entities
//!
//! - [`Host`] - nameserver resource created by the host create flow
//! - [`Domain`] - registered domain; only its subordinate host set is written here
//!
//! # Pure Rules
//!
//! - [`invariants`] - depth and address constraints, parameterized by lookups

pub mod host;
pub mod hostname;
pub mod invariants;
pub mod network;
pub mod registered_domain;

pub use host::{ClientId, Host, HostKey, StatusValue};
pub use hostname::{canonical_form, HostName};
pub use invariants::{enforce_ip_constraints, validate_host_depth, Classification};
pub use network::{parse_addresses, DeclaredAddress, IpVersion};
pub use registered_domain::{Domain, DomainKey};
