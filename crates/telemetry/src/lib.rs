//! File-access telemetry for the Burrow checkout filesystem
//!
//! Every filesystem operation handler in the daemon can record who/why
//! triggered an inode access without knowing anything about the analytics
//! backend. This crate provides the seam:
//!
//! # Architecture
//!
//! - [`AccessEvent`]: immutable value describing one access (inode, cause,
//!   cause detail, mount path)
//! - [`AccessLogger`]: the polymorphic sink shared across call sites
//! - [`NullLogger`]: disabled variant, a guaranteed no-op
//! - [`QueuedLogger`]: active variant, relays enriched records to an
//!   [`AccessTransport`] through a bounded queue and background task
//! - [`ConfigHandle`]: reloadable configuration snapshot, re-read on every
//!   logged event
//! - [`HostContext`]: non-owning lookup seam into the hosting daemon
//!
//! # Hot-path discipline
//!
//! `log_access` runs inline on filesystem threads. It never blocks, never
//! errors, and never allocates in the disabled variant; backend I/O happens
//! only on the relay task behind the transport seam.

pub mod config;
pub mod event;
pub mod host;
pub mod logger;
pub mod session;
pub mod transport;

pub use config::{ConfigHandle, TelemetryConfig, DEFAULT_QUEUE_CAPACITY};
pub use event::{AccessCause, AccessEvent};
pub use host::HostContext;
pub use logger::{build_or_null, AccessLogger, NullLogger, QueuedLogger, RelayHandle};
pub use session::SessionInfo;
pub use transport::{AccessRecord, AccessTransport, MemoryTransport, TransportError};
