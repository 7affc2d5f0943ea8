// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Name Value Object with Registry Validation Invariants
//!
//! A [`HostName`] can only be obtained through [`HostName::parse`], which
//! rejects anything that is not already in the registry's canonical form.
//! The registry never silently rewrites a name; it tells the client the form
//! it expected instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{FlowError, FlowResult};

/// Fully qualified, normalized host name
///
/// Invariants:
/// - Lowercase ASCII, every label already in its ASCII-compatible encoding
/// - Labels separated by single dots, no trailing dot, no empty labels
/// - Labels contain only alphanumerics and hyphens, never at either end
/// - Each label ≤ 63 octets, encoded (wire) length ≤ 255 octets
///
/// # Examples
///
/// ```rust
/// use host_registry::domain::HostName;
///
/// let host = HostName::parse("ns1.example.tld").unwrap();
/// assert_eq!(host.label_count(), 3);
///
/// assert!(HostName::parse("ns1.EXAMPLE.tld").is_err());
/// assert!(HostName::parse("ns1.example.tld.").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostName(String);

impl HostName {
    /// Maximum encoded length: one length octet per label plus the root octet
    pub const MAX_ENCODED_LENGTH: usize = 255;

    /// Maximum length for a single label (RFC 1035)
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Validate a raw name and return it as a host name
    ///
    /// Checks run in a fixed order and the first violation wins:
    /// character set, case, punycode, normalization, length.
    pub fn parse(raw: &str) -> FlowResult<Self> {
        check_syntax(raw)?;

        let lower = raw.to_lowercase();
        if lower != raw {
            return Err(FlowError::HostNameNotLowerCase { expected: lower });
        }

        let ascii = to_ascii(raw)?;
        if ascii != raw {
            return Err(FlowError::HostNameNotPunyCoded { expected: ascii });
        }

        let canonical = join_labels(raw);
        if canonical.is_empty() {
            return Err(FlowError::InvalidHostName);
        }
        if canonical != raw {
            return Err(FlowError::HostNameNotNormalized {
                expected: canonical,
            });
        }

        if encoded_length(raw) > Self::MAX_ENCODED_LENGTH {
            return Err(FlowError::HostNameTooLong);
        }
        if raw.split('.').any(|label| label.len() > Self::MAX_LABEL_LENGTH) {
            return Err(FlowError::InvalidHostName);
        }

        Ok(Self(canonical))
    }

    /// Get the host name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Labels from leftmost (host) to rightmost (TLD)
    pub fn labels(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    pub fn label_count(&self) -> usize {
        self.0.split('.').count()
    }

    /// The suffix made of the rightmost `count` labels
    ///
    /// Returns the whole name when `count` is at least the label count.
    pub fn suffix(&self, count: usize) -> &str {
        let total = self.label_count();
        if count == 0 {
            return "";
        }
        if count >= total {
            return &self.0;
        }
        let skip = total - count;
        let offset = self
            .0
            .match_indices('.')
            .nth(skip - 1)
            .map(|(idx, _)| idx + 1)
            .unwrap_or(0);
        &self.0[offset..]
    }

    /// Proper suffixes from longest to shortest (`a.b.c` yields `b.c`, `c`)
    pub fn proper_suffixes(&self) -> impl Iterator<Item = &str> {
        self.0
            .match_indices('.')
            .map(move |(idx, _)| &self.0[idx + 1..])
    }
}

/// Apply every rewrite the validator asks clients for
///
/// Lowercases, converts to ASCII-compatible encoding and drops empty labels.
/// Returns `None` for input that no rewrite can turn into a valid name.
/// The result is a fixed point: feeding it back returns it unchanged.
pub fn canonical_form(raw: &str) -> Option<String> {
    check_syntax(raw).ok()?;
    let ascii = to_ascii(&raw.to_lowercase()).ok()?;
    let canonical = join_labels(&ascii);
    if canonical.is_empty() {
        None
    } else {
        Some(canonical)
    }
}

/// Reject characters and label shapes that no rewrite could repair
fn check_syntax(raw: &str) -> FlowResult<()> {
    if raw.is_empty() {
        return Err(FlowError::InvalidHostName);
    }

    // Non-ASCII is left to IDNA conversion
    let permitted =
        |ch: char| ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' || !ch.is_ascii();
    if !raw.chars().all(permitted) {
        return Err(FlowError::InvalidHostName);
    }

    let bad_hyphen = raw
        .split('.')
        .any(|label| label.starts_with('-') || label.ends_with('-'));
    if bad_hyphen {
        return Err(FlowError::InvalidHostName);
    }

    Ok(())
}

/// IDNA to-ASCII; the converted form must itself be a valid LDH name
fn to_ascii(name: &str) -> FlowResult<String> {
    let ascii = idna::domain_to_ascii(name).map_err(|_| FlowError::InvalidHostName)?;
    check_syntax(&ascii)?;
    Ok(ascii)
}

fn join_labels(name: &str) -> String {
    name.split('.')
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn encoded_length(name: &str) -> usize {
    name.split('.').map(|label| label.len() + 1).sum::<usize>() + 1
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HostName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HostName {
    type Error = FlowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for HostName {
    type Error = FlowError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HostName> for String {
    fn from(value: HostName) -> Self {
        value.0
    }
}
