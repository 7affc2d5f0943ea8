// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry configuration
//!
//! Loaded from environment variables with defaults applied:
//!
//! | Variable | Default |
//! |---|---|
//! | `REGISTRY_NATS_URL` | unset: DNS refreshes stay in memory |
//! | `REGISTRY_DNS_SUBJECT_PREFIX` | `registry.dns` |
//! | `REGISTRY_DNS_REFRESH_TIMEOUT_MS` | `5000` (at least 1) |
//! | `REGISTRY_TX_MAX_ATTEMPTS` | `5` (at least 1) |
//! | `REGISTRY_PUBLIC_SUFFIX_LIST` | unset: bundled rule set |

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::nats::NatsConfig;
use crate::service::DEFAULT_DNS_REFRESH_TIMEOUT;
use crate::store::memory::DEFAULT_MAX_ATTEMPTS;
use crate::subjects::DEFAULT_DNS_PREFIX;
use crate::suffix::PublicSuffixRules;

pub const NATS_URL_VAR: &str = "REGISTRY_NATS_URL";
pub const DNS_SUBJECT_PREFIX_VAR: &str = "REGISTRY_DNS_SUBJECT_PREFIX";
pub const DNS_REFRESH_TIMEOUT_VAR: &str = "REGISTRY_DNS_REFRESH_TIMEOUT_MS";
pub const TX_MAX_ATTEMPTS_VAR: &str = "REGISTRY_TX_MAX_ATTEMPTS";
pub const PUBLIC_SUFFIX_LIST_VAR: &str = "REGISTRY_PUBLIC_SUFFIX_LIST";

/// Configuration for the host registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// NATS servers for DNS refresh publishing, if any
    pub nats: Option<NatsConfig>,
    /// Subject prefix DNS refresh requests are published under
    pub dns_subject_prefix: String,
    /// Deadline for enqueueing a DNS refresh after commit
    pub dns_refresh_timeout: Duration,
    /// Transaction attempts before giving up on contention
    pub tx_max_attempts: u32,
    /// Public suffix list file replacing the bundled rules
    pub public_suffix_list: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            nats: None,
            dns_subject_prefix: DEFAULT_DNS_PREFIX.to_string(),
            dns_refresh_timeout: DEFAULT_DNS_REFRESH_TIMEOUT,
            tx_max_attempts: DEFAULT_MAX_ATTEMPTS,
            public_suffix_list: None,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> InfrastructureResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> InfrastructureResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let nats = value(NATS_URL_VAR).map(|url| NatsConfig::with_servers(&url));

        let dns_subject_prefix =
            value(DNS_SUBJECT_PREFIX_VAR).unwrap_or_else(|| DEFAULT_DNS_PREFIX.to_string());

        let dns_refresh_timeout = match value(DNS_REFRESH_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) if millis >= 1 => Duration::from_millis(millis),
                _ => {
                    return Err(InfrastructureError::Configuration(format!(
                        "{} must be a positive number of milliseconds, got {:?}",
                        DNS_REFRESH_TIMEOUT_VAR, raw
                    )))
                }
            },
            None => DEFAULT_DNS_REFRESH_TIMEOUT,
        };

        let tx_max_attempts = match value(TX_MAX_ATTEMPTS_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(attempts) if attempts >= 1 => attempts,
                _ => {
                    return Err(InfrastructureError::Configuration(format!(
                        "{} must be a positive integer, got {:?}",
                        TX_MAX_ATTEMPTS_VAR, raw
                    )))
                }
            },
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let public_suffix_list = value(PUBLIC_SUFFIX_LIST_VAR).map(PathBuf::from);

        Ok(Self {
            nats,
            dns_subject_prefix,
            dns_refresh_timeout,
            tx_max_attempts,
            public_suffix_list,
        })
    }

    /// Suffix rules from the configured file, or the bundled set
    pub fn load_suffix_rules(&self) -> InfrastructureResult<PublicSuffixRules> {
        match &self.public_suffix_list {
            Some(path) => PublicSuffixRules::from_file(path),
            None => Ok(PublicSuffixRules::bundled()),
        }
    }
}
