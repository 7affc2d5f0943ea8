// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS client abstraction for registry messaging

use async_nats::{Client, ConnectOptions};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{InfrastructureError, InfrastructureResult};

/// Configuration for NATS connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "host-registry".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl NatsConfig {
    /// Configuration for a comma separated server list
    pub fn with_servers(servers: &str) -> Self {
        Self {
            servers: servers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            ..Self::default()
        }
    }
}

/// NATS client wrapper publishing JSON payloads
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect with the given configuration
    pub async fn new(config: NatsConfig) -> InfrastructureResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout);

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| InfrastructureError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self { client })
    }

    /// Publish `message` as JSON and flush so the broker has it on return
    pub async fn publish<T>(&self, subject: &str, message: &T) -> InfrastructureResult<()>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| InfrastructureError::NatsPublish(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| InfrastructureError::NatsPublish(e.to_string()))?;

        debug!("Published message to subject: {}", subject);
        Ok(())
    }
}
