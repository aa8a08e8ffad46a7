//! Access event types
//!
//! An [`AccessEvent`] describes a single file or directory access observed by
//! the filesystem layer. Call sites build one immediately before logging and
//! move it into the logger; nothing retains it afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a filesystem operation touched an inode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessCause {
    /// The call site did not record a cause
    Unknown,
    /// Kernel FUSE request (user readdir, open, read, ...)
    Fuse,
    /// Client RPC into the daemon
    Rpc,
    /// Background prefetching
    Prefetch,
}

impl AccessCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessCause::Unknown => "unknown",
            AccessCause::Fuse => "fuse",
            AccessCause::Rpc => "rpc",
            AccessCause::Prefetch => "prefetch",
        }
    }
}

impl std::str::FromStr for AccessCause {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "fuse" => AccessCause::Fuse,
            "rpc" => AccessCause::Rpc,
            "prefetch" => AccessCause::Prefetch,
            _ => AccessCause::Unknown,
        })
    }
}

impl std::fmt::Display for AccessCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One file or directory access
///
/// Immutable once constructed. The mount path identifies which mounted
/// checkout the inode belongs to; inode numbers are only unique within a
/// single daemon process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEvent {
    /// Inode number of the object accessed
    pub inode: u64,
    /// Reason category for the access
    pub cause: AccessCause,
    /// Free-form refinement of the cause, when the call site has one
    pub cause_detail: Option<String>,
    /// Absolute path of the mounted checkout
    pub mount_path: PathBuf,
}

impl AccessEvent {
    /// Create a new access event
    pub fn new(
        inode: u64,
        cause: AccessCause,
        cause_detail: Option<String>,
        mount_path: PathBuf,
    ) -> Self {
        Self {
            inode,
            cause,
            cause_detail,
            mount_path,
        }
    }
}
