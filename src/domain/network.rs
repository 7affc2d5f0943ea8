// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants
//!
//! Clients declare every host address together with the IP version they claim
//! it has. The literal is checked against both grammars so a v4 literal tagged
//! `v6` (or the reverse) is reported as a version mismatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::errors::{FlowError, FlowResult};

/// Declared IP version tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "v4"),
            IpVersion::V6 => write!(f, "v6"),
        }
    }
}

/// An address as it arrives on the wire: a version tag plus an unparsed literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredAddress {
    #[serde(rename = "ip")]
    pub declared_version: IpVersion,
    #[serde(rename = "address")]
    pub literal: String,
}

impl DeclaredAddress {
    pub fn v4(literal: impl Into<String>) -> Self {
        Self {
            declared_version: IpVersion::V4,
            literal: literal.into(),
        }
    }

    pub fn v6(literal: impl Into<String>) -> Self {
        Self {
            declared_version: IpVersion::V6,
            literal: literal.into(),
        }
    }

    /// Parse the literal under the grammar of its declared version
    ///
    /// # Errors
    /// - `IpAddressVersionMismatch` if the literal is in the other family's grammar
    /// - `InvalidIpAddress` if it is in neither grammar
    pub fn parse(&self) -> FlowResult<IpAddr> {
        let literal = self.literal.trim();
        let as_v4 = literal.parse::<Ipv4Addr>().ok();
        let as_v6 = literal.parse::<Ipv6Addr>().ok();

        match (self.declared_version, as_v4, as_v6) {
            (IpVersion::V4, Some(v4), _) => Ok(IpAddr::V4(v4)),
            (IpVersion::V6, _, Some(v6)) => Ok(IpAddr::V6(v6)),
            (IpVersion::V4, None, Some(_)) | (IpVersion::V6, Some(_), None) => {
                Err(FlowError::IpAddressVersionMismatch {
                    literal: self.literal.clone(),
                })
            }
            (_, None, None) => Err(FlowError::InvalidIpAddress {
                literal: self.literal.clone(),
            }),
        }
    }
}

/// Parse every declared address, keeping the first occurrence of duplicates
pub fn parse_addresses(declared: &[DeclaredAddress]) -> FlowResult<Vec<IpAddr>> {
    let mut addresses: Vec<IpAddr> = Vec::with_capacity(declared.len());
    for address in declared {
        let parsed = address.parse()?;
        if !addresses.contains(&parsed) {
            addresses.push(parsed);
        }
    }
    Ok(addresses)
}
