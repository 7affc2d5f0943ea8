// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Registry Store
//!
//! Optimistic-concurrency implementation of [`RegistryStore`] used by tests,
//! dry runs and the command line tool.
//!
//! # Concurrency Model
//!
//! Every host name and every domain carries a version number. A transaction
//! attempt records the version of each key it reads and buffers its writes.
//! Commit takes the state lock, re-checks every recorded version and only
//! then applies the writes, so two attempts that read the same key cannot
//! both commit. A losing attempt is re-run against fresh state until it
//! commits, aborts, or the attempt budget is spent.
//!
//! Domain versions track lifecycle changes only (status, deletion). Merging a
//! host name into the subordinate set leaves the version alone, so concurrent
//! creates of different hosts under one domain never invalidate each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::domain::{Domain, DomainKey, Host, HostKey, HostName};
use crate::errors::{FlowError, FlowResult, InfrastructureError, InfrastructureResult};
use crate::history::HistoryEntry;
use crate::store::{BillingEvent, CommitMode, RegistryStore, StoreTransaction, ZoneInventory};

/// Default number of attempts before a transaction reports `RetriesExhausted`
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Default)]
struct StoreState {
    managed_zones: BTreeSet<String>,
    /// Every host ever stored under a name, oldest first
    hosts: HashMap<String, Vec<Host>>,
    host_versions: HashMap<String, u64>,
    domains: HashMap<String, Domain>,
    domain_versions: HashMap<String, u64>,
    history: Vec<HistoryEntry>,
    billing_events: Vec<BillingEvent>,
}

impl StoreState {
    fn active_host(&self, host_name: &str, now: DateTime<Utc>) -> Option<&Host> {
        self.hosts
            .get(host_name)?
            .iter()
            .rev()
            .find(|host| host.is_active_at(now))
    }

    fn active_domain(&self, domain_name: &str, now: DateTime<Utc>) -> Option<&Domain> {
        self.domains
            .get(domain_name)
            .filter(|domain| domain.is_active_at(now))
    }

    fn bump(versions: &mut HashMap<String, u64>, key: &str) {
        *versions.entry(key.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ReadKey {
    Host(String),
    Domain(String),
}

#[derive(Debug)]
enum Mutation {
    InsertHost(Host),
    AppendHistory(HistoryEntry),
    MergeSubordinateHost {
        domain: DomainKey,
        host_name: String,
    },
    InsertBillingEvent(BillingEvent),
}

/// Buffered transaction attempt
struct MemoryTransaction<'s> {
    state: &'s RwLock<StoreState>,
    reads: HashMap<ReadKey, u64>,
    writes: Vec<Mutation>,
}

impl<'s> MemoryTransaction<'s> {
    fn new(state: &'s RwLock<StoreState>) -> Self {
        Self {
            state,
            reads: HashMap::new(),
            writes: Vec::new(),
        }
    }

    fn read_state(&self) -> InfrastructureResult<RwLockReadGuard<'s, StoreState>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn buffered_host(&self, host_name: &HostName, now: DateTime<Utc>) -> Option<&Host> {
        self.writes.iter().rev().find_map(|write| match write {
            Mutation::InsertHost(host) if host.host_name == *host_name && host.is_active_at(now) => {
                Some(host)
            }
            _ => None,
        })
    }

    /// Re-check every recorded version under the write lock
    fn validate(&self, state: &StoreState) -> bool {
        self.reads.iter().all(|(key, version)| {
            let current = match key {
                ReadKey::Host(name) => state.host_versions.get(name),
                ReadKey::Domain(name) => state.domain_versions.get(name),
            };
            current.copied().unwrap_or(0) == *version
        })
    }

    fn apply(self, state: &mut StoreState) {
        for write in self.writes {
            match write {
                Mutation::InsertHost(host) => {
                    let name = host.host_name.to_string();
                    StoreState::bump(&mut state.host_versions, &name);
                    state.hosts.entry(name).or_default().push(host);
                }
                Mutation::AppendHistory(entry) => state.history.push(entry),
                Mutation::MergeSubordinateHost { domain, host_name } => {
                    match state.domains.values_mut().find(|d| d.key == domain) {
                        Some(domain) => {
                            domain.merge_subordinate_host(&host_name);
                        }
                        None => warn!(
                            "Subordinate merge for {} skipped, domain {} is gone",
                            host_name, domain
                        ),
                    }
                }
                Mutation::InsertBillingEvent(event) => state.billing_events.push(event),
            }
        }
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn load_active_host(
        &mut self,
        host_name: &HostName,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Host>> {
        if let Some(host) = self.buffered_host(host_name, now) {
            return Ok(Some(host.clone()));
        }

        let state = self.read_state()?;
        let key = host_name.to_string();
        let version = state.host_versions.get(&key).copied().unwrap_or(0);
        let host = state.active_host(&key, now).cloned();
        drop(state);

        self.reads.entry(ReadKey::Host(key)).or_insert(version);
        Ok(host)
    }

    fn load_active_domain(
        &mut self,
        domain_name: &str,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Domain>> {
        let state = self.read_state()?;
        let version = state.domain_versions.get(domain_name).copied().unwrap_or(0);
        let domain = state.active_domain(domain_name, now).cloned();
        drop(state);

        self.reads
            .entry(ReadKey::Domain(domain_name.to_string()))
            .or_insert(version);
        Ok(domain)
    }

    fn insert_host(&mut self, host: Host) {
        self.writes.push(Mutation::InsertHost(host));
    }

    fn append_history(&mut self, entry: HistoryEntry) {
        self.writes.push(Mutation::AppendHistory(entry));
    }

    fn merge_subordinate_host(&mut self, domain: DomainKey, host_name: &HostName) {
        self.writes.push(Mutation::MergeSubordinateHost {
            domain,
            host_name: host_name.to_string(),
        });
    }

    fn insert_billing_event(&mut self, event: BillingEvent) {
        self.writes.push(Mutation::InsertBillingEvent(event));
    }
}

fn poisoned() -> InfrastructureError {
    InfrastructureError::StoreUnavailable("registry state lock poisoned".to_string())
}

/// Shared, cloneable in-memory registry
#[derive(Debug, Clone)]
pub struct InMemoryRegistryStore {
    state: Arc<RwLock<StoreState>>,
    max_attempts: u32,
}

impl Default for InMemoryRegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the attempt budget (at least one attempt is always made)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn read(&self) -> InfrastructureResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> InfrastructureResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| poisoned())
    }

    /// Register a zone (TLD or multi-label zone) as administered here
    pub fn add_managed_zone(&self, zone: impl Into<String>) -> InfrastructureResult<()> {
        self.write()?.managed_zones.insert(zone.into());
        Ok(())
    }

    /// Insert or replace a domain row, as the domain flows would
    pub fn put_domain(&self, domain: Domain) -> InfrastructureResult<()> {
        let mut state = self.write()?;
        StoreState::bump(&mut state.domain_versions, &domain.domain_name);
        state.domains.insert(domain.domain_name.clone(), domain);
        Ok(())
    }

    /// Insert a host row directly, bypassing the create flow
    pub fn put_host(&self, host: Host) -> InfrastructureResult<()> {
        let mut state = self.write()?;
        let name = host.host_name.to_string();
        StoreState::bump(&mut state.host_versions, &name);
        state.hosts.entry(name).or_default().push(host);
        Ok(())
    }

    /// Current domain row regardless of deletion state
    pub fn domain(&self, domain_name: &str) -> InfrastructureResult<Option<Domain>> {
        Ok(self.read()?.domains.get(domain_name).cloned())
    }

    /// Every host row stored under a name, oldest first
    pub fn hosts_named(&self, host_name: &str) -> InfrastructureResult<Vec<Host>> {
        Ok(self
            .read()?
            .hosts
            .get(host_name)
            .cloned()
            .unwrap_or_default())
    }

    pub fn history_for(&self, host_key: HostKey) -> InfrastructureResult<Vec<HistoryEntry>> {
        Ok(self
            .read()?
            .history
            .iter()
            .filter(|entry| entry.host_key == host_key)
            .cloned()
            .collect())
    }

    pub fn history(&self) -> InfrastructureResult<Vec<HistoryEntry>> {
        Ok(self.read()?.history.clone())
    }

    pub fn billing_events(&self) -> InfrastructureResult<Vec<BillingEvent>> {
        Ok(self.read()?.billing_events.clone())
    }
}

#[async_trait]
impl ZoneInventory for InMemoryRegistryStore {
    async fn is_managed_zone(&self, zone: &str) -> InfrastructureResult<bool> {
        Ok(self.read()?.managed_zones.contains(zone))
    }

    async fn lookup_active_domain(
        &self,
        domain_name: &str,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Domain>> {
        Ok(self.read()?.active_domain(domain_name, now).cloned())
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn lookup_active_host(
        &self,
        host_name: &HostName,
        now: DateTime<Utc>,
    ) -> InfrastructureResult<Option<Host>> {
        Ok(self.read()?.active_host(host_name.as_str(), now).cloned())
    }

    async fn transact<T, F>(&self, mode: CommitMode, mut body: F) -> FlowResult<T>
    where
        T: Send,
        F: FnMut(&mut dyn StoreTransaction) -> FlowResult<T> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let mut transaction = MemoryTransaction::new(&self.state);
            let value = body(&mut transaction)?;

            if mode == CommitMode::RollBack {
                debug!("Transaction rolled back after attempt {}", attempt);
                return Ok(value);
            }

            let mut state = self.write()?;
            if transaction.validate(&state) {
                transaction.apply(&mut state);
                debug!("Transaction committed on attempt {}", attempt);
                return Ok(value);
            }
            drop(state);

            debug!("Transaction attempt {} conflicted, retrying", attempt);
        }

        Err(FlowError::Infrastructure(InfrastructureError::RetriesExhausted {
            attempts: self.max_attempts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, StatusValue};
    use chrono::Duration;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("1999-04-03T22:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn host(name: &str, deletion_time: Option<DateTime<Utc>>) -> Host {
        Host {
            key: HostKey::new(),
            host_name: HostName::parse(name).unwrap(),
            addresses: vec![],
            superordinate_domain: None,
            sponsoring_client: ClientId::new("TheRegistrar"),
            creating_client: ClientId::new("TheRegistrar"),
            statuses: BTreeSet::from([StatusValue::Ok]),
            creation_time: now() - Duration::days(10),
            deletion_time,
            last_superordinate_change: None,
        }
    }

    #[tokio::test]
    async fn test_tombstones_are_not_active() {
        let store = InMemoryRegistryStore::new();
        store
            .put_host(host("ns1.example.tld", Some(now() - Duration::days(1))))
            .unwrap();
        let name = HostName::parse("ns1.example.tld").unwrap();
        assert!(store.lookup_active_host(&name, now()).await.unwrap().is_none());
        assert_eq!(store.hosts_named("ns1.example.tld").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_aborted_body_writes_nothing() {
        let store = InMemoryRegistryStore::new();
        let result: FlowResult<()> = store
            .transact(CommitMode::Commit, |tx| {
                tx.insert_host(host("ns1.example.tld", None));
                Err(FlowError::HostNameTooShallow)
            })
            .await;
        assert_eq!(result, Err(FlowError::HostNameTooShallow));
        assert!(store.hosts_named("ns1.example.tld").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roll_back_discards_writes() {
        let store = InMemoryRegistryStore::new();
        store
            .transact(CommitMode::RollBack, |tx| {
                tx.insert_host(host("ns1.example.tld", None));
                Ok(())
            })
            .await
            .unwrap();
        assert!(store.hosts_named("ns1.example.tld").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflicting_write_forces_retry() {
        let store = InMemoryRegistryStore::new();
        let name = HostName::parse("ns1.example.tld").unwrap();
        let mut attempts = 0;

        let seen = store
            .transact(CommitMode::Commit, |tx| {
                attempts += 1;
                let existing = tx.load_active_host(&name, now())?;
                if attempts == 1 {
                    // a concurrent writer commits between our read and commit
                    store.put_host(host("ns1.example.tld", None))?;
                }
                Ok(existing.is_some())
            })
            .await
            .unwrap();

        assert_eq!(attempts, 2);
        assert!(seen);
    }

    #[tokio::test]
    async fn test_retry_budget_is_enforced() {
        let store = InMemoryRegistryStore::new().with_max_attempts(3);
        let name = HostName::parse("ns1.example.tld").unwrap();

        let result: FlowResult<()> = store
            .transact(CommitMode::Commit, |tx| {
                tx.load_active_host(&name, now())?;
                store.put_host(host("ns1.example.tld", Some(now() - Duration::days(1))))?;
                Ok(())
            })
            .await;

        assert_eq!(
            result,
            Err(FlowError::Infrastructure(InfrastructureError::RetriesExhausted { attempts: 3 }))
        );
    }

    #[tokio::test]
    async fn test_subordinate_merge_does_not_conflict_with_domain_readers() {
        let store = InMemoryRegistryStore::new();
        let domain = Domain::new("example.tld", ClientId::new("TheRegistrar"), now());
        let key = domain.key;
        store.put_domain(domain).unwrap();
        let ns1 = HostName::parse("ns1.example.tld").unwrap();
        let ns2 = HostName::parse("ns2.example.tld").unwrap();
        let mut attempts = 0;

        store
            .transact(CommitMode::Commit, |tx| {
                attempts += 1;
                tx.load_active_domain("example.tld", now())?;
                tx.merge_subordinate_host(key, &ns1);
                Ok(())
            })
            .await
            .unwrap();
        store
            .transact(CommitMode::Commit, |tx| {
                attempts += 1;
                tx.load_active_domain("example.tld", now())?;
                tx.merge_subordinate_host(key, &ns2);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(attempts, 2);
        let domain = store.domain("example.tld").unwrap().unwrap();
        assert_eq!(
            domain.subordinate_hosts,
            BTreeSet::from(["ns1.example.tld".to_string(), "ns2.example.tld".to_string()])
        );
    }

    #[tokio::test]
    async fn test_billing_events_are_transactional() {
        let store = InMemoryRegistryStore::new();
        store
            .transact(CommitMode::Commit, |tx| {
                tx.insert_billing_event(BillingEvent {
                    event_id: Uuid::now_v7(),
                    client_id: ClientId::new("TheRegistrar"),
                    reason: "CREATE".to_string(),
                    event_time: now(),
                });
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(store.billing_events().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zone_inventory() {
        let store = InMemoryRegistryStore::new();
        store.add_managed_zone("tld").unwrap();
        store
            .put_domain(
                Domain::new("gone.tld", ClientId::new("TheRegistrar"), now())
                    .with_pending_delete(now() - Duration::days(1)),
            )
            .unwrap();

        assert!(store.is_managed_zone("tld").await.unwrap());
        assert!(!store.is_managed_zone("example").await.unwrap());
        assert!(store
            .lookup_active_domain("gone.tld", now())
            .await
            .unwrap()
            .is_none());
    }
}
