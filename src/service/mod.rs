// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Registry Commands
//!
//! Services coordinate between:
//! - **Command Handlers**: pure domain logic in [`crate::aggregate`]
//! - **Registry Store**: lookups and the atomic transaction
//! - **DNS Queue**: refresh requests for committed subordinate hosts
//! - **Activity Reporter**: per-command server activity
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Validation → Command Handler → rows
//!     ↓
//! RegistryStore::transact
//!     ↓
//! DNS refresh queue (NATS)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use host_registry::service::{HostCreateFlow, HostCreateService};
//!
//! let flow = HostCreateFlow::with_defaults(store);
//! let response = flow.create_host(&context, command).await?;
//! ```

pub mod host_create;

pub use host_create::{
    HostCreateFlow, HostCreateResponse, HostCreateService, DEFAULT_DNS_REFRESH_TIMEOUT,
};
