//! Reloadable telemetry configuration
//!
//! Configuration lives outside any single logger: the host process owns a
//! [`ConfigHandle`] and may swap in a new [`TelemetryConfig`] at any time
//! (config file reload, remote rollout flag). Loggers read a fresh snapshot
//! on every call, so a reload takes effect on the next event with no
//! notification mechanism.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Default bound on the relay queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Telemetry configuration values
///
/// The default configuration is fully off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Master switch, re-read on every logged event
    pub enabled: bool,
    /// Keep one event in N; 0 or 1 keeps every event
    pub sample_denominator: u32,
    /// Bound on the relay queue, fixed when a logger is spawned
    pub queue_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_denominator: 1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl TelemetryConfig {
    /// Create an enabled configuration that keeps every event
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}

/// Cheaply cloneable handle to process-wide reloadable configuration
///
/// All clones observe the same underlying value. Readers take an `Arc`
/// snapshot and release the lock immediately; a concurrent [`replace`] never
/// blocks behind logging and vice versa.
///
/// [`replace`]: ConfigHandle::replace
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<TelemetryConfig>>>,
}

impl ConfigHandle {
    /// Create a handle holding the given initial configuration
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Snapshot the current configuration
    pub fn current(&self) -> Arc<TelemetryConfig> {
        self.inner.read().clone()
    }

    /// Swap in a new configuration
    ///
    /// Visible to every clone of this handle on its next [`current`] call.
    ///
    /// [`current`]: ConfigHandle::current
    pub fn replace(&self, config: TelemetryConfig) {
        *self.inner.write() = Arc::new(config);
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}
