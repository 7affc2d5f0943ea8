// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host registry components for a domain-name registry
//!
//! This crate implements nameserver (host) creation: name normalization,
//! public suffix depth checks, placement under managed domains, glue address
//! rules, and the atomic create transaction with its DNS refresh trigger.

pub mod activity;
pub mod aggregate;
pub mod config;
pub mod dns;
pub mod domain;
pub mod errors;
pub mod history;
pub mod nats;
pub mod service;
pub mod state_machine;
pub mod store;
pub mod subjects;
pub mod suffix;

// Re-export commonly used types
pub use aggregate::{CreateHostCommand, RequestContext};
pub use config::RegistryConfig;
pub use errors::{FlowError, FlowResult, InfrastructureError, InfrastructureResult, ResultCode};
pub use nats::{NatsClient, NatsConfig};
pub use service::{HostCreateFlow, HostCreateResponse, HostCreateService};
