// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registered Domain Entity
//!
//! Domains are owned by the domain lifecycle flows. The host create flow only
//! reads their existence and status, and merges new names into the
//! subordinate host set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::domain::host::{ClientId, StatusValue};

/// Repository key of a domain row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainKey(pub Uuid);

impl DomainKey {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DomainKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain-{}", self.0)
    }
}

/// Domain row, restricted to the fields host creation touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub key: DomainKey,
    pub domain_name: String,
    pub sponsoring_client: ClientId,
    pub statuses: BTreeSet<StatusValue>,
    /// Fully qualified names of hosts under this domain
    pub subordinate_hosts: BTreeSet<String>,
    pub creation_time: DateTime<Utc>,
    pub deletion_time: Option<DateTime<Utc>>,
}

impl Domain {
    /// New active domain with no subordinate hosts
    pub fn new(
        domain_name: impl Into<String>,
        sponsoring_client: ClientId,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            key: DomainKey::new(),
            domain_name: domain_name.into(),
            sponsoring_client,
            statuses: BTreeSet::from([StatusValue::Ok]),
            subordinate_hosts: BTreeSet::new(),
            creation_time,
            deletion_time: None,
        }
    }

    /// Put the domain into pending delete, to be purged at `deletion_time`
    pub fn with_pending_delete(mut self, deletion_time: DateTime<Utc>) -> Self {
        self.statuses.remove(&StatusValue::Ok);
        self.statuses.insert(StatusValue::PendingDelete);
        self.deletion_time = Some(deletion_time);
        self
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.deletion_time.map_or(true, |deleted| deleted > now)
    }

    pub fn is_pending_delete(&self) -> bool {
        self.statuses.contains(&StatusValue::PendingDelete)
    }

    /// Union `host_name` into the subordinate set; returns false if already present
    pub fn merge_subordinate_host(&mut self, host_name: &str) -> bool {
        self.subordinate_hosts.insert(host_name.to_string())
    }
}
