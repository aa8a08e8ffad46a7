//! Backend transport seam
//!
//! The telemetry core never talks to an analytics pipeline directly. It hands
//! enriched [`AccessRecord`]s to an [`AccessTransport`], and the transport
//! owns serialization, batching, and delivery. Transport failures stay on
//! this side of the seam: the relay worker absorbs them and the filesystem
//! never sees an error.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::event::{AccessCause, AccessEvent};
use crate::session::SessionInfo;

/// Enriched access record handed to the transport
///
/// Carries the event fields plus the session identity captured at logger
/// construction and, when the host daemon could resolve it, the checkout's
/// correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRecord {
    pub inode: u64,
    pub cause: AccessCause,
    pub cause_detail: Option<String>,
    pub mount_path: PathBuf,
    pub session: SessionInfo,
    pub client_id: Option<String>,
}

impl AccessRecord {
    /// Build a record from an event and the logger's captured context
    pub fn new(event: AccessEvent, session: SessionInfo, client_id: Option<String>) -> Self {
        Self {
            inode: event.inode,
            cause: event.cause,
            cause_detail: event.cause_detail,
            mount_path: event.mount_path,
            session,
            client_id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// One-way edge to the analytics pipeline
///
/// `ship` is called from the relay worker, never from the filesystem hot
/// path, so implementations may perform I/O. Errors are logged and counted
/// by the caller; they do not stop the relay.
#[async_trait]
pub trait AccessTransport: Send + Sync + 'static {
    /// Deliver one record to the backend
    async fn ship(&self, record: AccessRecord) -> Result<(), TransportError>;
}

/// In-memory transport that captures records in a `Vec`
///
/// Used by tests and by hosts that only want in-process capture. Clones
/// share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    records: Arc<Mutex<Vec<AccessRecord>>>,
}

impl MemoryTransport {
    /// Create a new empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record shipped so far
    pub fn records(&self) -> Vec<AccessRecord> {
        self.records.lock().clone()
    }

    /// Number of records shipped so far
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether any records have been shipped
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccessTransport for MemoryTransport {
    async fn ship(&self, record: AccessRecord) -> Result<(), TransportError> {
        self.records.lock().push(record);
        Ok(())
    }
}
