// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Handlers for the Host Aggregate
//!
//! Handlers take already-loaded state plus validated input and either return
//! the rows to write or the failure kind. They never touch the store:
//!
//! ```text
//! handle_*(loaded state, input) → Result<rows to write, FlowError>
//! ```
//!
//! The same handlers run for the advisory pre-checks and for the
//! authoritative re-checks inside the transaction.

use std::net::IpAddr;

use uuid::Uuid;

use crate::aggregate::commands::RequestContext;
use crate::domain::{ClientId, Domain, DomainKey, Host, HostKey, HostName};
use crate::errors::{FlowError, FlowResult};
use crate::history::{HistoryEntry, HistoryType};

/// Rows written by a successful host create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCreated {
    pub host: Host,
    pub history: HistoryEntry,
}

/// Where an existing active host was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniquenessCheck {
    /// Advisory lookup before the transaction
    PreTransaction,
    /// Authoritative lookup inside the transaction
    InTransaction,
}

/// Classify a name collision with an existing active host
///
/// # Business Rules
/// - No active host: the name is free (tombstones never count)
/// - Pre-transaction, same sponsor: `AlreadyExistsForThisClient`
/// - Pre-transaction, other sponsor: `CreateContention`
/// - Inside the transaction, any active host: `CreateContention`
pub fn handle_uniqueness(
    existing: Option<&Host>,
    host_name: &HostName,
    client: &ClientId,
    check: UniquenessCheck,
) -> FlowResult<()> {
    let Some(existing) = existing else {
        return Ok(());
    };

    let name = host_name.to_string();
    match check {
        UniquenessCheck::PreTransaction if existing.sponsoring_client == *client => {
            Err(FlowError::AlreadyExistsForThisClient { name })
        }
        _ => Err(FlowError::CreateContention { name }),
    }
}

/// Re-validate a superordinate domain loaded at commit time
///
/// # Business Rules
/// - The domain must still exist and be active
/// - A domain in pending delete may not gain subordinate hosts
pub fn handle_superordinate_domain(
    domain_name: &str,
    loaded: Option<Domain>,
) -> FlowResult<Domain> {
    let domain = loaded.ok_or_else(|| FlowError::SuperordinateDomainDoesNotExist {
        domain: domain_name.to_string(),
    })?;

    if domain.is_pending_delete() {
        return Err(FlowError::SuperordinateDomainInPendingDelete {
            domain: domain_name.to_string(),
        });
    }

    Ok(domain)
}

/// Build the new host row and its history entry
///
/// The creation time is the request's transaction time; the host starts
/// with the default status set and no deletion time.
pub fn handle_create_host(
    host_name: HostName,
    addresses: Vec<IpAddr>,
    superordinate_domain: Option<DomainKey>,
    client: &ClientId,
    context: &RequestContext,
) -> HostCreated {
    let host = Host {
        key: HostKey::new(),
        host_name,
        addresses,
        superordinate_domain,
        sponsoring_client: client.clone(),
        creating_client: client.clone(),
        statuses: Host::default_statuses(),
        creation_time: context.now,
        deletion_time: None,
        last_superordinate_change: None,
    };

    let history = HistoryEntry {
        entry_version: HistoryEntry::CURRENT_VERSION,
        entry_id: Uuid::now_v7(),
        history_type: HistoryType::HostCreate,
        host_key: host.key,
        host_name: host.host_name.clone(),
        client_id: client.clone(),
        modification_time: context.now,
        correlation_id: context.correlation_id,
    };

    HostCreated { host, history }
}
