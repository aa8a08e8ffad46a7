//! Host daemon lookup seam
//!
//! Active logger variants sometimes need context only the hosting daemon
//! has, such as the correlation id of the checkout behind a mount path.
//! [`HostContext`] exposes that as a lookup-only trait; loggers hold it as
//! `Option<Weak<dyn HostContext>>` and must tolerate the host being absent
//! (tests, early startup) or already torn down (shutdown races).

use std::path::Path;

/// Read-only view of the hosting daemon
///
/// Implementations must not block: lookups run inline on the filesystem hot
/// path.
pub trait HostContext: Send + Sync + std::fmt::Debug {
    /// Correlation id of the checkout mounted at `mount_path`, if known
    fn client_id(&self, mount_path: &Path) -> Option<String>;
}
