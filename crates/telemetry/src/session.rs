//! Session identity for access attribution
//!
//! A [`SessionInfo`] is captured once when a logger is constructed and never
//! changes afterwards. Active logger variants attach it to every outgoing
//! record so the analytics pipeline can attribute accesses to a user and
//! machine.

use serde::{Deserialize, Serialize};

/// Immutable session identity snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub username: String,
    pub hostname: String,
    pub os: String,
    pub os_version: String,
    pub client_version: String,
}

impl SessionInfo {
    /// Collect a best-effort session descriptor from the environment
    ///
    /// Pieces that cannot be determined are left empty; collection never
    /// fails.
    pub fn collect() -> Self {
        Self {
            username: std::env::var("USER")
                .or_else(|_| std::env::var("LOGNAME"))
                .unwrap_or_default(),
            hostname: hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_default(),
            os: std::env::consts::OS.to_string(),
            os_version: os_version(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(target_os = "linux")]
fn os_version() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn os_version() -> String {
    String::new()
}
