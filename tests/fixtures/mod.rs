// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for host-registry
//!
//! Provides a deterministic registry for flow tests: fixed clock, fixed
//! client ids, one managed TLD with one active domain.
//!
//! # Design Principles
//! - The clock is fixed; tests never read `Utc::now()`
//! - Fixtures are the only place that seeds registry rows
//! - Every collaborator is in memory and inspectable after the run

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use host_registry::activity::RecordingActivityReporter;
use host_registry::dns::InMemoryDnsQueue;
use host_registry::domain::{ClientId, DeclaredAddress, Domain, Host, HostKey, HostName, StatusValue};
use host_registry::store::InMemoryRegistryStore;
use host_registry::suffix::PublicSuffixRules;
use host_registry::{CreateHostCommand, HostCreateFlow, RequestContext};

pub const CLIENT_ID: &str = "TheRegistrar";
pub const OTHER_CLIENT_ID: &str = "NewRegistrar";

pub const CORRELATION_ID_1: &str = "01934f4a-c001-7000-8000-00000000c001";

// Fixed test timestamp
pub const FIXED_TIMESTAMP: &str = "1999-04-03T22:00:00Z";

pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn correlation_id() -> Uuid {
    Uuid::parse_str(CORRELATION_ID_1).expect("Invalid UUID in test fixture")
}

pub fn client() -> ClientId {
    ClientId::new(CLIENT_ID)
}

pub fn context() -> RequestContext {
    RequestContext::new(client(), fixed_timestamp()).with_correlation_id(correlation_id())
}

pub fn context_for(client_id: &str) -> RequestContext {
    RequestContext::new(ClientId::new(client_id), fixed_timestamp())
        .with_correlation_id(correlation_id())
}

/// `ns1.example.tld` with one v4 and one v6 glue address
pub fn subordinate_command() -> CreateHostCommand {
    CreateHostCommand::new("ns1.example.tld")
        .with_address(DeclaredAddress::v4("192.0.2.2"))
        .with_address(DeclaredAddress::v6("1080:0:0:0:8:800:200C:417A"))
}

/// In-memory registry with its observable collaborators
pub struct Registry {
    pub store: InMemoryRegistryStore,
    pub dns: InMemoryDnsQueue,
    pub activity: RecordingActivityReporter,
    pub flow: HostCreateFlow<InMemoryRegistryStore>,
}

impl Registry {
    /// Empty registry managing nothing
    pub fn empty() -> Self {
        let store = InMemoryRegistryStore::new();
        let dns = InMemoryDnsQueue::new();
        let activity = RecordingActivityReporter::new();
        let flow = HostCreateFlow::new(
            store.clone(),
            Arc::new(PublicSuffixRules::bundled()),
            Arc::new(dns.clone()),
            Arc::new(activity.clone()),
        );
        Self {
            store,
            dns,
            activity,
            flow,
        }
    }

    /// Registry managing `tld` with no domains
    pub fn with_tld() -> Self {
        let registry = Self::empty();
        registry.manage("tld");
        registry
    }

    /// Registry managing `tld` with `example.tld` active
    pub fn standard() -> Self {
        let registry = Self::with_tld();
        registry.add_domain("example.tld");
        registry
    }

    pub fn manage(&self, zone: &str) {
        self.store
            .add_managed_zone(zone)
            .expect("Failed to add managed zone");
    }

    pub fn add_domain(&self, name: &str) -> Domain {
        let domain = Domain::new(name, client(), fixed_timestamp() - Duration::days(30));
        self.store
            .put_domain(domain.clone())
            .expect("Failed to seed domain");
        domain
    }

    pub fn add_pending_delete_domain(&self, name: &str) -> Domain {
        let domain = Domain::new(name, client(), fixed_timestamp() - Duration::days(30))
            .with_pending_delete(fixed_timestamp() + Duration::days(35));
        self.store
            .put_domain(domain.clone())
            .expect("Failed to seed domain");
        domain
    }

    /// Seed a host row; `deleted` puts its deletion time in the past
    pub fn add_host(&self, name: &str, sponsor: &str, deleted: bool) -> Host {
        let host = Host {
            key: HostKey::new(),
            host_name: HostName::parse(name).expect("Invalid host name in fixture"),
            addresses: vec![],
            superordinate_domain: None,
            sponsoring_client: ClientId::new(sponsor),
            creating_client: ClientId::new(sponsor),
            statuses: BTreeSet::from([StatusValue::Ok]),
            creation_time: fixed_timestamp() - Duration::days(10),
            deletion_time: deleted.then(|| fixed_timestamp() - Duration::days(1)),
            last_superordinate_change: None,
        };
        self.store.put_host(host.clone()).expect("Failed to seed host");
        host
    }

    pub fn domain(&self, name: &str) -> Domain {
        self.store
            .domain(name)
            .expect("Store unavailable")
            .expect("Domain missing")
    }

    pub fn queued_refreshes(&self) -> Vec<String> {
        self.dns.queued_names().expect("DNS queue unavailable")
    }

    /// Whether any host, active or not, was written under `name`
    pub fn host_rows(&self, name: &str) -> Vec<Host> {
        self.store.hosts_named(name).expect("Store unavailable")
    }

    /// Nothing observable happened
    pub fn assert_untouched(&self, name: &str, hosts_before: usize) {
        assert_eq!(self.host_rows(name).len(), hosts_before);
        assert!(self.store.history().expect("Store unavailable").is_empty());
        assert!(self.queued_refreshes().is_empty());
        assert!(self.activity.records().is_empty());
    }
}
