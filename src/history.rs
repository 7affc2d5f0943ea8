// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource History Entries
//!
//! Every successful mutation of a registry resource writes exactly one
//! history entry in the same transaction. Entries are immutable facts:
//! - Never updated or deleted after commit
//! - Past tense type naming (`HostCreate` records a create that happened)
//! - Carry the correlation id of the request that produced them
//! - Versioned for schema evolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::{ClientId, HostKey, HostName};

/// Kind of mutation a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    HostCreate,
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryType::HostCreate => write!(f, "HOST_CREATE"),
        }
    }
}

/// Immutable audit record of one mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry version for schema evolution
    pub entry_version: u32,

    /// Unique entry identifier (UUID v7 for time ordering)
    pub entry_id: Uuid,

    pub history_type: HistoryType,

    /// Resource this entry describes
    pub host_key: HostKey,

    /// Name of the resource at the time of the mutation
    pub host_name: HostName,

    /// Client that initiated the mutation
    pub client_id: ClientId,

    /// Transaction time of the mutation
    pub modification_time: DateTime<Utc>,

    /// Correlation ID of the originating request
    pub correlation_id: Uuid,
}

impl HistoryEntry {
    pub const CURRENT_VERSION: u32 = 1;
}
