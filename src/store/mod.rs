// Copyright (c) 2025 - Cowboy AI, Inc.
//! Registry Store Abstraction
//!
//! Narrow collaborator interfaces the host create flow runs against. The
//! concrete storage engine is irrelevant to the flow as long as it provides:
//!
//! 1. **Lookup by name**: active hosts and domains by exact foreign key
//! 2. **Atomic read-modify-write**: a transaction body either commits every
//!    write or none of them
//! 3. **Serializable reads**: anything the body read is unchanged at commit,
//!    otherwise the body is re-run against fresh state
//! 4. **Mergeable subordinate sets**: adding a host name to a domain's
//!    subordinate set is a union applied at commit, not an overwrite
//!
//! # Architecture
//!
//! ```text
//! HostCreateFlow ──lookups──→ RegistryStore / ZoneInventory
//!        │
//!        └──transact(body)──→ StoreTransaction (buffered reads/writes)
//!                                   ↓ commit (validate reads, apply writes)
//!                              persistent state
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ClientId, Domain, DomainKey, Host, HostName};
use crate::errors::{FlowResult, InfrastructureResult};
use crate::history::HistoryEntry;

pub mod memory;

pub use memory::InMemoryRegistryStore;

/// Whether a transaction body's writes are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    Commit,
    /// Run the body, then discard its writes
    RollBack,
}

/// Inventory of zones the registry administers and the domains under them
#[async_trait]
pub trait ZoneInventory: Send + Sync {
    /// Whether `zone` (a TLD or multi-label zone) is administered here
    async fn is_managed_zone(&self, zone: &str) -> InfrastructureResult<bool>;

    /// Domain with exactly this name that is active at `now`
    async fn lookup_active_domain(
        &self,
        domain_name: &str,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Domain>>;
}

/// Read and write access inside one transaction attempt
///
/// Reads are recorded and validated at commit; writes are buffered and only
/// become visible when the attempt commits.
pub trait StoreTransaction {
    fn load_active_host(
        &mut self,
        host_name: &HostName,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Host>>;

    fn load_active_domain(
        &mut self,
        domain_name: &str,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Domain>>;

    fn insert_host(&mut self, host: Host);

    fn append_history(&mut self, entry: HistoryEntry);

    /// Union `host_name` into the domain's subordinate host set at commit
    fn merge_subordinate_host(&mut self, domain: DomainKey, host_name: &HostName);

    fn insert_billing_event(&mut self, event: BillingEvent);
}

/// Transactional persistent store for registry resources
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Host with this name that is active at `now`; tombstones are skipped
    async fn lookup_active_host(
        &self,
        host_name: &HostName,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Host>>;

    /// Run `body` atomically
    ///
    /// The body may run more than once when a concurrent writer invalidates
    /// its reads. A body returning `Err` aborts with no writes applied.
    async fn transact<T, F>(&self, mode: CommitMode, body: F) -> FlowResult<T>
    where
        T: Send,
        F: FnMut(&mut dyn StoreTransaction) -> FlowResult<T> + Send;
}

/// One-time or recurring charge recorded by billable flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingEvent {
    pub event_id: Uuid,
    pub client_id: ClientId,
    pub reason: String,
    pub event_time: DateTime<Utc>,
}
