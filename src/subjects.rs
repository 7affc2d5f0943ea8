// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subjects for DNS refresh requests
//!
//! Host refresh requests are published under a configurable prefix:
//!
//! ```text
//! {prefix}.refresh.host
//! ```
//!
//! # Examples
//!
//! ```rust
//! use host_registry::subjects::host_refresh;
//!
//! assert_eq!(host_refresh("registry.dns"), "registry.dns.refresh.host");
//! ```

/// Prefix used when none is configured
pub const DEFAULT_DNS_PREFIX: &str = "registry.dns";

const REFRESH_SEGMENT: &str = "refresh";
const HOST_SEGMENT: &str = "host";

/// Subject host refresh requests are published on; trailing dots in
/// `prefix` are dropped
pub fn host_refresh(prefix: &str) -> String {
    format!(
        "{}.{}.{}",
        prefix.trim_end_matches('.'),
        REFRESH_SEGMENT,
        HOST_SEGMENT
    )
}
