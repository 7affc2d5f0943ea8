// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS Refresh Queue
//!
//! After a subordinate host commits, its name is handed to the DNS writer so
//! glue records are republished. The flow only depends on [`DnsRefreshQueue`];
//! delivery is at least once and asynchronous to the request.
//!
//! ```text
//! HostCreateFlow ──enqueue_refresh(name)──→ DnsRefreshQueue
//!                                               ├── InMemoryDnsQueue (tests, dry tooling)
//!                                               └── NatsDnsQueue → {prefix}.refresh.host
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::domain::HostName;
use crate::errors::{InfrastructureError, InfrastructureResult};

pub mod nats;

pub use self::nats::NatsDnsQueue;

/// Payload of one refresh request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub host_name: HostName,
    pub requested_at: DateTime<Utc>,
}

/// Sink for DNS refresh requests
#[async_trait]
pub trait DnsRefreshQueue: Send + Sync {
    async fn enqueue_refresh(&self, host_name: &HostName) -> InfrastructureResult<()>;
}

/// Queue that keeps requests in memory until drained
#[derive(Debug, Clone, Default)]
pub struct InMemoryDnsQueue {
    requests: Arc<Mutex<Vec<RefreshRequest>>>,
}

impl InMemoryDnsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests enqueued so far, oldest first
    pub fn queued(&self) -> InfrastructureResult<Vec<RefreshRequest>> {
        Ok(self.lock()?.clone())
    }

    /// Host names enqueued so far, oldest first
    pub fn queued_names(&self) -> InfrastructureResult<Vec<String>> {
        Ok(self
            .lock()?
            .iter()
            .map(|request| request.host_name.to_string())
            .collect())
    }

    /// Remove and return every queued request
    pub fn drain(&self) -> InfrastructureResult<Vec<RefreshRequest>> {
        Ok(std::mem::take(&mut *self.lock()?))
    }

    fn lock(&self) -> InfrastructureResult<std::sync::MutexGuard<'_, Vec<RefreshRequest>>> {
        self.requests
            .lock()
            .map_err(|_| InfrastructureError::StoreUnavailable("DNS queue lock poisoned".to_string()))
    }
}

#[async_trait]
impl DnsRefreshQueue for InMemoryDnsQueue {
    async fn enqueue_refresh(&self, host_name: &HostName) -> InfrastructureResult<()> {
        self.lock()?.push(RefreshRequest {
            host_name: host_name.clone(),
            requested_at: Utc::now(),
        });
        debug!("Queued DNS refresh for {}", host_name);
        Ok(())
    }
}
