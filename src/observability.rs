//! Logging setup and in-process counters

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `telemetry.log_filter` when set. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(telemetry: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&telemetry.log_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    commands_handled: AtomicU64,
    commands_failed: AtomicU64,
    requests_rejected: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_handled(&self) {
        self.commands_handled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "commands_handled", "Metric incremented");
    }

    pub fn command_failed(&self) {
        self.commands_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "commands_failed", "Metric incremented");
    }

    /// A request carried a wrong or missing token
    pub fn request_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "requests_rejected", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_handled: self.commands_handled.load(Ordering::Relaxed),
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub commands_handled: u64,
    pub commands_failed: u64,
    pub requests_rejected: u64,
}
