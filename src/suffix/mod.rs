// Copyright (c) 2025 - Cowboy AI, Inc.
//! Public Suffix Rules
//!
//! Parses rule sets in the Public Suffix List format and answers the single
//! question the host flow needs: what is the longest public suffix of a name.
//!
//! Rule semantics follow the PSL algorithm:
//! - `co.uk` matches exactly that suffix
//! - `*.ck` matches any single label directly under `ck`
//! - `!www.ck` cancels a wildcard; `www.ck` is registrable and its public
//!   suffix is `ck`
//!
//! Unlike the PSL reference algorithm there is no implicit `*` rule: a TLD
//! absent from the list has no public suffix at all, and the depth check
//! falls back to the TLD itself.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::domain::HostName;
use crate::errors::{InfrastructureError, InfrastructureResult};

const BUNDLED_RULES: &str = include_str!("public_suffix_list.dat");

/// Source of public suffix answers
pub trait PublicSuffixList: Send + Sync {
    /// Longest suffix of `name` that is a public suffix, if any
    fn longest_public_suffix<'a>(&self, name: &'a HostName) -> Option<&'a str>;
}

/// Parsed rule set
#[derive(Debug, Clone, Default)]
pub struct PublicSuffixRules {
    exact: HashSet<String>,
    /// Parents of wildcard rules (`*.ck` is stored as `ck`)
    wildcard: HashSet<String>,
    exception: HashSet<String>,
}

impl PublicSuffixRules {
    /// Parse PSL-formatted text
    ///
    /// Only the first whitespace-delimited token of each line is read, as the
    /// list format specifies. Unicode rules are converted to ASCII so they
    /// compare against normalized host names.
    pub fn parse(text: &str) -> Self {
        let mut rules = Self::default();

        for line in text.lines() {
            let Some(token) = line.split_whitespace().next() else {
                continue;
            };
            if token.starts_with("//") {
                continue;
            }

            let (target, rule) = if let Some(rest) = token.strip_prefix('!') {
                (&mut rules.exception, rest)
            } else if let Some(rest) = token.strip_prefix("*.") {
                (&mut rules.wildcard, rest)
            } else {
                (&mut rules.exact, token)
            };

            match idna::domain_to_ascii(rule) {
                Ok(ascii) if !ascii.is_empty() => {
                    target.insert(ascii);
                }
                _ => debug!("Skipping unparseable public suffix rule: {}", token),
            }
        }

        rules
    }

    /// The rule set compiled into the crate
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_RULES)
    }

    /// Load a rule set from a PSL-formatted file
    pub fn from_file(path: impl AsRef<Path>) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            InfrastructureError::Configuration(format!(
                "cannot read public suffix list {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcard.len() + self.exception.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PublicSuffixList for PublicSuffixRules {
    fn longest_public_suffix<'a>(&self, name: &'a HostName) -> Option<&'a str> {
        let whole = std::iter::once(name.as_str());

        for candidate in whole.chain(name.proper_suffixes()) {
            let parent = candidate.split_once('.').map(|(_, parent)| parent);

            if self.exception.contains(candidate) {
                return parent;
            }
            if self.exact.contains(candidate) {
                return Some(candidate);
            }
            if parent.is_some_and(|parent| self.wildcard.contains(parent)) {
                return Some(candidate);
            }
        }

        None
    }
}
