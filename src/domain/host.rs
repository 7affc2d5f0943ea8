// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Entity
//!
//! A nameserver resource. Rows are only ever created by the create flow; a
//! row whose deletion time has passed is a tombstone and never blocks a new
//! host with the same name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

use crate::domain::hostname::HostName;
use crate::domain::registered_domain::DomainKey;

/// Repository key of a host row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostKey(pub Uuid);

impl HostKey {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for HostKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host-{}", self.0)
    }
}

/// Identifier of the registrar (client) sponsoring a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Protocol status flags shared by hosts and domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusValue {
    Ok,
    Linked,
    PendingCreate,
    PendingDelete,
    PendingTransfer,
    PendingUpdate,
    ClientDeleteProhibited,
    ClientUpdateProhibited,
    ServerDeleteProhibited,
    ServerUpdateProhibited,
}

/// Nameserver resource row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub key: HostKey,
    pub host_name: HostName,
    /// Parsed addresses, in declaration order
    pub addresses: Vec<IpAddr>,
    pub superordinate_domain: Option<DomainKey>,
    pub sponsoring_client: ClientId,
    pub creating_client: ClientId,
    pub statuses: BTreeSet<StatusValue>,
    pub creation_time: DateTime<Utc>,
    pub deletion_time: Option<DateTime<Utc>>,
    /// Last time the superordinate domain reference changed; unset on create
    pub last_superordinate_change: Option<DateTime<Utc>>,
}

impl Host {
    /// Status flags a freshly created host carries
    pub fn default_statuses() -> BTreeSet<StatusValue> {
        BTreeSet::from([StatusValue::Ok])
    }

    /// Active iff the deletion time is unset or still in the future
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.deletion_time.map_or(true, |deleted| deleted > now)
    }

    pub fn is_subordinate(&self) -> bool {
        self.superordinate_domain.is_some()
    }
}
