//! Polymorphic access loggers
//!
//! This module is the seam between the filesystem hot path and the analytics
//! pipeline:
//!
//! - `AccessLogger`: the contract every variant implements
//! - `NullLogger`: disabled variant, guaranteed no-op
//! - `QueuedLogger`: active variant, relays records to a transport through a
//!   bounded queue drained by a background task
//!
//! Every filesystem operation handler shares one logger instance for the
//! daemon's lifetime. A logger's kind is fixed at construction; enablement
//! and sampling inside the active variant are re-read from the reloadable
//! configuration on every call.

mod null;
mod queued;

pub use null::NullLogger;
pub use queued::{QueuedLogger, RelayHandle};

use std::sync::Weak;

use crate::config::ConfigHandle;
use crate::event::AccessEvent;
use crate::host::HostContext;
use crate::session::SessionInfo;
use crate::transport::{AccessTransport, TransportError};

/// Sink for file-access telemetry
///
/// Implementations must be safe to call from many threads with no
/// caller-side synchronization, and `log_access` must return promptly
/// regardless of backend health: telemetry is best-effort and never affects
/// filesystem correctness or latency.
pub trait AccessLogger: Send + Sync + std::fmt::Debug {
    /// Record one access
    ///
    /// Infallible from the caller's point of view. Backend failures are
    /// absorbed behind the transport seam; a disabled logger discards the
    /// event outright.
    fn log_access(&self, event: AccessEvent);

    /// Produce a sibling instance of the same concrete kind
    ///
    /// The sibling is built from the context already captured in `self`
    /// (session, configuration visibility, relay queue), so holders of a
    /// `Box<dyn AccessLogger>` can mint compatible instances for their own
    /// subsystems without re-deriving any wiring.
    fn clone_logger(&self) -> Box<dyn AccessLogger>;
}

impl Clone for Box<dyn AccessLogger> {
    fn clone(&self) -> Self {
        self.clone_logger()
    }
}

/// Build an active logger, degrading to the null variant if the transport
/// could not be initialized
///
/// Telemetry must never prevent the daemon from starting: a missing
/// credential or unreachable endpoint costs the records, not the process.
/// Returns the relay handle alongside the logger so the host can drain the
/// worker at shutdown; the handle is `None` when the null variant was
/// chosen.
///
/// Must be called from within a tokio runtime.
pub fn build_or_null<T>(
    session: SessionInfo,
    config: ConfigHandle,
    host: Option<Weak<dyn HostContext>>,
    transport: Result<T, TransportError>,
) -> (Box<dyn AccessLogger>, Option<RelayHandle>)
where
    T: AccessTransport,
{
    match transport {
        Ok(transport) => {
            let (logger, handle) = QueuedLogger::spawn(session, config, host, transport);
            (Box::new(logger), Some(handle))
        }
        Err(e) => {
            tracing::warn!(error = %e, "telemetry transport unavailable, access logging disabled");
            (Box::new(NullLogger::new()), None)
        }
    }
}
