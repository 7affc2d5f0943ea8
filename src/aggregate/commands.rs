// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Commands and Request Context
//!
//! Commands express client intent and carry raw, unvalidated input exactly
//! as the protocol layer decoded it. Validation happens in the flow.
//!
//! # Time Handling
//!
//! The request context carries an explicit `now`.
//! **NEVER call `Utc::now()` in domain logic**.
//! Time is passed from the application layer and doubles as the transaction
//! time for everything the request writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ClientId, DeclaredAddress};

/// Session and request scoped state, passed explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated registrar; `None` when the session is not logged in
    pub client_id: Option<ClientId>,

    /// Logical clock reading for this request
    pub now: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Run every check and roll back instead of committing
    pub dry_run: bool,
}

impl RequestContext {
    pub fn new(client_id: ClientId, now: DateTime<Utc>) -> Self {
        Self {
            client_id: Some(client_id),
            now,
            correlation_id: Uuid::now_v7(),
            dry_run: false,
        }
    }

    /// Context for a session with no authenticated client
    pub fn anonymous(now: DateTime<Utc>) -> Self {
        Self {
            client_id: None,
            now,
            correlation_id: Uuid::now_v7(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

/// Command to create a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHostCommand {
    /// Host name as submitted, not yet validated
    pub host_name: String,

    /// Declared addresses, in submission order
    #[serde(default)]
    pub addresses: Vec<DeclaredAddress>,
}

impl CreateHostCommand {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            addresses: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: DeclaredAddress) -> Self {
        self.addresses.push(address);
        self
    }
}
