// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Create Tool
//!
//! Runs one host create request against an in-memory registry seeded from a
//! JSON file and prints the response (or the failure and its result code).
//!
//! Run with: cargo run --bin host-create -- <seed.json> <request.json>
//!
//! Seed file:
//!
//! ```json
//! {
//!   "managed_zones": ["tld"],
//!   "domains": [{ "name": "example.tld", "client_id": "TheRegistrar" }]
//! }
//! ```
//!
//! Request file:
//!
//! ```json
//! {
//!   "client_id": "TheRegistrar",
//!   "dry_run": false,
//!   "command": {
//!     "host_name": "ns1.example.tld",
//!     "addresses": [{ "ip": "v4", "address": "192.0.2.2" }]
//!   }
//! }
//! ```
//!
//! When `REGISTRY_NATS_URL` is set, DNS refresh requests are published there;
//! otherwise they are printed with the response. `REGISTRY_DNS_REFRESH_TIMEOUT_MS`
//! bounds how long a committed create waits on the publish.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;

use host_registry::activity::TracingActivityReporter;
use host_registry::dns::{DnsRefreshQueue, InMemoryDnsQueue, NatsDnsQueue};
use host_registry::domain::{ClientId, Domain};
use host_registry::store::InMemoryRegistryStore;
use host_registry::{
    CreateHostCommand, HostCreateFlow, HostCreateService, RegistryConfig, RequestContext,
};

#[derive(Debug, Deserialize)]
struct SeedDomain {
    name: String,
    client_id: String,
    #[serde(default)]
    pending_delete: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    managed_zones: Vec<String>,
    #[serde(default)]
    domains: Vec<SeedDomain>,
}

#[derive(Debug, Deserialize)]
struct Request {
    client_id: Option<String>,
    #[serde(default)]
    dry_run: bool,
    command: CreateHostCommand,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn seed_store(seed: Seed, config: &RegistryConfig) -> Result<InMemoryRegistryStore> {
    let store = InMemoryRegistryStore::new().with_max_attempts(config.tx_max_attempts);
    let now = Utc::now();

    for zone in seed.managed_zones {
        store.add_managed_zone(zone)?;
    }
    for domain in seed.domains {
        let mut row = Domain::new(domain.name, ClientId::new(domain.client_id), now);
        if domain.pending_delete {
            row = row.with_pending_delete(now + Duration::days(35));
        }
        store.put_domain(row)?;
    }

    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(seed_path), Some(request_path)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: host-create <seed.json> <request.json>");
    };

    let config = RegistryConfig::from_env().context("Invalid registry configuration")?;
    info!("Configuration loaded: {:?}", config);

    let seed: Seed = read_json(Path::new(&seed_path))?;
    let request: Request = read_json(Path::new(&request_path))?;
    let store = seed_store(seed, &config)?;

    let memory_queue = InMemoryDnsQueue::new();
    let dns: Arc<dyn DnsRefreshQueue> = match &config.nats {
        Some(nats) => Arc::new(
            NatsDnsQueue::connect(nats.clone(), &config.dns_subject_prefix)
                .await
                .context("Failed to connect to NATS")?,
        ),
        None => Arc::new(memory_queue.clone()),
    };

    let flow = HostCreateFlow::new(
        store,
        Arc::new(config.load_suffix_rules()?),
        dns,
        Arc::new(TracingActivityReporter),
    )
    .with_dns_refresh_timeout(config.dns_refresh_timeout);

    let now = Utc::now();
    let mut context = match request.client_id {
        Some(client) => RequestContext::new(ClientId::new(client), now),
        None => RequestContext::anonymous(now),
    };
    if request.dry_run {
        context = context.with_dry_run();
    }

    match flow.create_host(&context, request.command).await {
        Ok(response) => {
            let output = serde_json::json!({
                "result_code": 1000,
                "response": response,
                "dns_refresh": memory_queue.queued_names()?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            let output = serde_json::json!({
                "result_code": e.result_code().code(),
                "message": e.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            std::process::exit(1);
        }
    }
}
