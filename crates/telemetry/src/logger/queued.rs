//! Active access logger
//!
//! Events are enriched inline, then pushed onto a bounded flume channel with
//! `try_send` so the filesystem thread never waits on the backend. A
//! dedicated relay task drains the channel and ships each record through the
//! transport; transport errors and queue overflow are counted and logged,
//! never surfaced to call sites.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::AccessLogger;
use crate::config::ConfigHandle;
use crate::event::AccessEvent;
use crate::host::HostContext;
use crate::session::SessionInfo;
use crate::transport::{AccessRecord, AccessTransport};

/// Access logger that relays records to a transport
///
/// One instance is spawned per daemon and shared by reference across every
/// filesystem operation handler. Enablement and sampling are re-read from
/// the [`ConfigHandle`] on each call, so a configuration reload takes effect
/// on the next event without reconstructing the logger.
#[derive(Debug)]
pub struct QueuedLogger {
    session: SessionInfo,
    config: ConfigHandle,
    host: Option<Weak<dyn HostContext>>,
    tx: flume::Sender<AccessRecord>,
    /// Records lost to queue overflow or transport failure, shared with
    /// siblings and the relay task
    dropped: Arc<AtomicU64>,
    /// Per-instance sampling position
    sample_counter: AtomicU64,
}

/// Handle to the relay task for graceful shutdown
#[derive(Debug)]
pub struct RelayHandle {
    shutdown_tx: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// Stop the relay task
    ///
    /// Records still queued at this point are dropped; telemetry is
    /// best-effort and shutdown should not wait on a slow backend.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

impl QueuedLogger {
    /// Spawn an active logger and its relay task
    ///
    /// The queue is bounded by the `queue_capacity` configured at spawn
    /// time; later configuration reloads affect enablement and sampling but
    /// not the capacity.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T>(
        session: SessionInfo,
        config: ConfigHandle,
        host: Option<Weak<dyn HostContext>>,
        transport: T,
    ) -> (Self, RelayHandle)
    where
        T: AccessTransport,
    {
        let capacity = config.current().queue_capacity.max(1);
        let (tx, rx) = flume::bounded(capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let dropped = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(relay(rx, transport, shutdown_rx, dropped.clone()));

        let logger = Self {
            session,
            config,
            host,
            tx,
            dropped,
            sample_counter: AtomicU64::new(0),
        };

        (logger, RelayHandle { shutdown_tx, task })
    }

    /// Number of records lost to queue overflow or transport failure
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Sampling decision for this call, re-read from the current config
    fn sampled(&self, denominator: u32) -> bool {
        if denominator <= 1 {
            return true;
        }
        let n = self.sample_counter.fetch_add(1, Ordering::Relaxed);
        n % denominator as u64 == 0
    }
}

impl AccessLogger for QueuedLogger {
    fn log_access(&self, event: AccessEvent) {
        let config = self.config.current();
        if !config.enabled {
            return;
        }
        if !self.sampled(config.sample_denominator) {
            return;
        }

        // The host is a non-owning back-reference; it may already be gone
        // during shutdown, in which case the record ships unenriched.
        let client_id = self
            .host
            .as_ref()
            .and_then(Weak::upgrade)
            .and_then(|host| host.client_id(&event.mount_path));

        let record = AccessRecord::new(event, self.session.clone(), client_id);
        if self.tx.try_send(record).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("telemetry queue full, dropping access record");
        }
    }

    fn clone_logger(&self) -> Box<dyn AccessLogger> {
        Box::new(Self {
            session: self.session.clone(),
            config: self.config.clone(),
            host: self.host.clone(),
            tx: self.tx.clone(),
            dropped: self.dropped.clone(),
            sample_counter: AtomicU64::new(0),
        })
    }
}

/// Drain the queue and ship records until shutdown or all senders drop
async fn relay<T>(
    rx: flume::Receiver<AccessRecord>,
    transport: T,
    mut shutdown_rx: watch::Receiver<()>,
    dropped: Arc<AtomicU64>,
) where
    T: AccessTransport,
{
    tracing::debug!("access relay started");

    let mut records = rx.into_stream();
    loop {
        let record = tokio::select! {
            record = records.next() => match record {
                Some(record) => record,
                None => break,
            },
            _ = shutdown_rx.changed() => break,
        };

        // Shutdown must not wait on a stuck backend either.
        tokio::select! {
            result = transport.ship(record) => {
                if let Err(e) = result {
                    dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(error = %e, "failed to ship access record");
                }
            }
            _ = shutdown_rx.changed() => break,
        }
    }

    tracing::debug!("access relay stopped");
}
