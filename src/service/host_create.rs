// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Create Service
//!
//! Orchestrates one host create request from raw input to committed rows.
//!
//! # Service Pattern
//!
//! ```text
//! CreateHostCommand
//!     ↓ HostName::parse                 (normalize, validate)
//!     ↓ validate_host_depth             (public suffix + managed zones)
//!     ↓ classify                        (External | Subordinate(domain))
//!     ↓ enforce_ip_constraints          (grammar, then glue rules)
//!     ↓ handle_uniqueness               (advisory pre-check)
//!     ↓ RegistryStore::transact         (authoritative re-checks, writes)
//!     ↓ DnsRefreshQueue                 (subordinate hosts only)
//!     ↓ ActivityReporter
//! HostCreateResponse
//! ```
//!
//! # Transaction Semantics
//!
//! Checks before the transaction are advisory; the transaction body re-reads
//! the host name and the superordinate domain and is the only place a
//! decision becomes durable. A failure anywhere leaves nothing persisted.
//! DNS refresh and activity reporting happen after commit and never turn a
//! committed create into a failure. The refresh enqueue is bounded by
//! [`DEFAULT_DNS_REFRESH_TIMEOUT`] (or the configured deadline) so an
//! unreachable queue cannot hold the response.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::activity::{ActivityReporter, TracingActivityReporter, HOST_CREATE_ACTIVITY};
use crate::aggregate::{
    handle_create_host, handle_superordinate_domain, handle_uniqueness, CreateHostCommand,
    HostCreated, RequestContext, UniquenessCheck,
};
use crate::dns::{DnsRefreshQueue, InMemoryDnsQueue};
use crate::domain::{
    enforce_ip_constraints, validate_host_depth, Classification, ClientId, DomainKey, HostKey,
    HostName,
};
use crate::errors::{FlowError, FlowResult};
use crate::state_machine::{HostCreateInput, HostCreateState, StateTrail};
use crate::store::{CommitMode, RegistryStore, ZoneInventory};
use crate::suffix::{PublicSuffixList, PublicSuffixRules};

/// Deadline for handing a committed host to the DNS refresh queue
pub const DEFAULT_DNS_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a successful (or dry-run) host create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCreateResponse {
    pub host_key: HostKey,
    pub host_name: HostName,
    pub addresses: Vec<IpAddr>,
    pub superordinate_domain: Option<DomainKey>,
    pub history_entry_id: Uuid,
    pub creation_time: DateTime<Utc>,
    /// True when every check ran but nothing was persisted
    pub dry_run: bool,
}

impl HostCreateResponse {
    fn from_created(created: &HostCreated, dry_run: bool) -> Self {
        Self {
            host_key: created.host.key,
            host_name: created.host.host_name.clone(),
            addresses: created.host.addresses.clone(),
            superordinate_domain: created.host.superordinate_domain,
            history_entry_id: created.history.entry_id,
            creation_time: created.host.creation_time,
            dry_run,
        }
    }
}

/// Host create service interface
#[async_trait]
pub trait HostCreateService: Send + Sync {
    /// Create a host
    ///
    /// # Returns
    /// - The new host's key, name and superordinate domain
    /// - A [`FlowError`] naming the single failure kind otherwise
    async fn create_host(
        &self,
        context: &RequestContext,
        command: CreateHostCommand,
    ) -> FlowResult<HostCreateResponse>;
}

/// Host create flow over a registry store
pub struct HostCreateFlow<S> {
    store: S,
    suffixes: Arc<dyn PublicSuffixList>,
    dns: Arc<dyn DnsRefreshQueue>,
    dns_refresh_timeout: Duration,
    activity: Arc<dyn ActivityReporter>,
}

impl<S> HostCreateFlow<S>
where
    S: RegistryStore + ZoneInventory,
{
    pub fn new(
        store: S,
        suffixes: Arc<dyn PublicSuffixList>,
        dns: Arc<dyn DnsRefreshQueue>,
        activity: Arc<dyn ActivityReporter>,
    ) -> Self {
        Self {
            store,
            suffixes,
            dns,
            dns_refresh_timeout: DEFAULT_DNS_REFRESH_TIMEOUT,
            activity,
        }
    }

    pub fn with_dns_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.dns_refresh_timeout = timeout;
        self
    }

    /// Flow with the bundled suffix rules, an in-memory DNS queue and
    /// tracing activity reports
    pub fn with_defaults(store: S) -> Self {
        Self::new(
            store,
            Arc::new(PublicSuffixRules::bundled()),
            Arc::new(InMemoryDnsQueue::new()),
            Arc::new(TracingActivityReporter),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Longest proper suffix of `name` that is a managed zone
    async fn longest_managed_zone<'a>(&self, name: &'a HostName) -> FlowResult<Option<&'a str>> {
        for suffix in name.proper_suffixes() {
            if self.store.is_managed_zone(suffix).await? {
                return Ok(Some(suffix));
            }
        }
        Ok(None)
    }

    /// Place the host relative to the domains this registry manages
    ///
    /// A name under a managed zone is in bailiwick; its superordinate domain
    /// is the zone plus one label and must exist.
    async fn classify(
        &self,
        name: &HostName,
        managed_zone: Option<&str>,
        now: DateTime<Utc>,
    ) -> FlowResult<Classification> {
        let Some(zone) = managed_zone else {
            return Ok(Classification::External);
        };

        let zone_labels = zone.split('.').count();
        let candidate = name.suffix(zone_labels + 1);

        match self.store.lookup_active_domain(candidate, now).await? {
            Some(domain) => Ok(Classification::Subordinate(domain)),
            None => Err(FlowError::SuperordinateDomainDoesNotExist {
                domain: candidate.to_string(),
            }),
        }
    }

    fn advance(machine: &mut StateTrail<HostCreateState>, input: HostCreateInput) {
        match machine.advance(&input) {
            Ok(()) => debug!("Host create on {} → {}", input, machine.current()),
            Err(e) => error!("Host create state machine rejected input: {}", e),
        }
    }

    async fn execute(
        &self,
        context: &RequestContext,
        command: &CreateHostCommand,
        machine: &mut StateTrail<HostCreateState>,
    ) -> FlowResult<HostCreateResponse> {
        let now = context.now;
        let client: &ClientId = context.client_id.as_ref().ok_or(FlowError::NotLoggedIn)?;

        let host_name = HostName::parse(&command.host_name)?;
        let managed_zone = self.longest_managed_zone(&host_name).await?;
        let public_suffix = self.suffixes.longest_public_suffix(&host_name);
        validate_host_depth(&host_name, public_suffix, managed_zone)?;
        Self::advance(machine, HostCreateInput::NameValidated);

        let classification = self.classify(&host_name, managed_zone, now).await?;
        let subordinate = classification.is_subordinate();
        Self::advance(machine, HostCreateInput::Classified { subordinate });

        let addresses = enforce_ip_constraints(&classification, &command.addresses)?;
        let existing = self.store.lookup_active_host(&host_name, now).await?;
        handle_uniqueness(
            existing.as_ref(),
            &host_name,
            client,
            UniquenessCheck::PreTransaction,
        )?;
        Self::advance(machine, HostCreateInput::ConstraintsPassed);

        let mode = if context.dry_run {
            CommitMode::RollBack
        } else {
            CommitMode::Commit
        };
        let superordinate_name = classification
            .superordinate()
            .map(|domain| domain.domain_name.clone());
        Self::advance(machine, HostCreateInput::TransactionStarted);

        let created = self
            .store
            .transact(mode, |tx| {
                let existing = tx.load_active_host(&host_name, now)?;
                handle_uniqueness(
                    existing.as_ref(),
                    &host_name,
                    client,
                    UniquenessCheck::InTransaction,
                )?;

                let superordinate = match &superordinate_name {
                    Some(name) => {
                        let loaded = tx.load_active_domain(name, now)?;
                        Some(handle_superordinate_domain(name, loaded)?)
                    }
                    None => None,
                };

                let created = handle_create_host(
                    host_name.clone(),
                    addresses.clone(),
                    superordinate.as_ref().map(|domain| domain.key),
                    client,
                    context,
                );
                tx.insert_host(created.host.clone());
                tx.append_history(created.history.clone());
                if let Some(domain) = &superordinate {
                    tx.merge_subordinate_host(domain.key, &host_name);
                }
                Ok(created)
            })
            .await?;

        if context.dry_run {
            Self::advance(machine, HostCreateInput::TransactionRolledBack);
            info!(
                "Dry run of host create for {} passed every check (correlation: {})",
                host_name, context.correlation_id
            );
            return Ok(HostCreateResponse::from_created(&created, true));
        }

        Self::advance(machine, HostCreateInput::TransactionCommitted);
        info!(
            "Created host {} ({}) for {} (correlation: {})",
            host_name, created.host.key, client, context.correlation_id
        );

        if subordinate {
            let enqueue = self.dns.enqueue_refresh(&host_name);
            match tokio::time::timeout(self.dns_refresh_timeout, enqueue).await {
                Ok(Ok(())) => Self::advance(machine, HostCreateInput::DnsRefreshEnqueued),
                Ok(Err(e)) => warn!("DNS refresh for {} not enqueued: {}", host_name, e),
                Err(_) => warn!(
                    "DNS refresh for {} not enqueued within {:?}",
                    host_name, self.dns_refresh_timeout
                ),
            }
        }

        self.activity.record(HOST_CREATE_ACTIVITY);

        Ok(HostCreateResponse::from_created(&created, false))
    }
}

#[async_trait]
impl<S> HostCreateService for HostCreateFlow<S>
where
    S: RegistryStore + ZoneInventory,
{
    async fn create_host(
        &self,
        context: &RequestContext,
        command: CreateHostCommand,
    ) -> FlowResult<HostCreateResponse> {
        debug!(
            "Host create received for {:?} (correlation: {})",
            command.host_name, context.correlation_id
        );
        let mut machine = StateTrail::new(HostCreateState::Received);

        let result = self.execute(context, &command, &mut machine).await;
        match &result {
            Ok(_) => debug!("Host create for {:?} finished: {}", command.host_name, machine),
            Err(e) => {
                Self::advance(&mut machine, HostCreateInput::Failed(e.clone()));
                if e.is_transient() {
                    warn!(
                        "Host create for {:?} failed: {} ({})",
                        command.host_name, e, machine
                    );
                } else {
                    info!(
                        "Host create for {:?} rejected with {}: {} ({})",
                        command.host_name,
                        e.result_code(),
                        e,
                        machine
                    );
                }
            }
        }
        result
    }
}
