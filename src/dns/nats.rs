// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS-backed DNS refresh queue

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::dns::{DnsRefreshQueue, RefreshRequest};
use crate::domain::HostName;
use crate::errors::InfrastructureResult;
use crate::nats::{NatsClient, NatsConfig};
use crate::subjects;

/// Publishes refresh requests as JSON on `{prefix}.refresh.host`
#[derive(Clone)]
pub struct NatsDnsQueue {
    client: NatsClient,
    subject: String,
}

impl NatsDnsQueue {
    pub async fn connect(config: NatsConfig, prefix: &str) -> InfrastructureResult<Self> {
        let client = NatsClient::new(config).await?;
        Ok(Self::with_client(client, prefix))
    }

    pub fn with_client(client: NatsClient, prefix: &str) -> Self {
        let subject = subjects::host_refresh(prefix);
        info!("DNS refresh requests will be published on {}", subject);
        Self { client, subject }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl DnsRefreshQueue for NatsDnsQueue {
    async fn enqueue_refresh(&self, host_name: &HostName) -> InfrastructureResult<()> {
        let request = RefreshRequest {
            host_name: host_name.clone(),
            requested_at: Utc::now(),
        };
        self.client.publish(&self.subject, &request).await?;
        debug!("Published DNS refresh for {}", host_name);
        Ok(())
    }
}
