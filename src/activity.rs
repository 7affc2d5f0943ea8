// Copyright (c) 2025 - Cowboy AI, Inc.
//! Server activity reporting
//!
//! Every successfully executed registry command is counted under an activity
//! name. Host creation reports as [`HOST_CREATE_ACTIVITY`].

use std::sync::{Arc, Mutex};

use tracing::info;

/// Activity name recorded for each committed host create
pub const HOST_CREATE_ACTIVITY: &str = "srs-host-create";

/// Sink for activity records
pub trait ActivityReporter: Send + Sync {
    fn record(&self, activity: &str);
}

/// Emits one `info` event per record with an `activity` field
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityReporter;

impl ActivityReporter for TracingActivityReporter {
    fn record(&self, activity: &str) {
        info!(activity, "Recorded server activity");
    }
}

/// Keeps records in memory for inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingActivityReporter {
    records: Arc<Mutex<Vec<String>>>,
}

impl RecordingActivityReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activities recorded so far, oldest first
    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl ActivityReporter for RecordingActivityReporter {
    fn record(&self, activity: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(activity.to_string());
        }
        info!(activity, "Recorded server activity");
    }
}
