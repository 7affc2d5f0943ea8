// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Aggregate: Commands and Pure Handlers
//!
//! ```text
//! Command → validate → handle_*(loaded state, input) → rows to write
//!    ↓                        ↓                             ↓
//! Intent               Business rules               Host + HistoryEntry
//! ```
//!
//! Handlers are pure: loading and persisting are the flow's job, so the same
//! rule can run against a pre-transaction read and a transactional read.

pub mod commands;
pub mod handlers;

pub use commands::{CreateHostCommand, RequestContext};
pub use handlers::{
    handle_create_host, handle_superordinate_domain, handle_uniqueness, HostCreated,
    UniquenessCheck,
};
