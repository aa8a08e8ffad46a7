//! Integration tests for the access logger variants
//!
//! These exercise the full pipeline (logger → bounded queue → relay task →
//! transport) with an in-memory transport, including the concurrency and
//! reload properties the filesystem hot path depends on.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;

use telemetry::{
    build_or_null, AccessCause, AccessEvent, AccessLogger, ConfigHandle, HostContext,
    MemoryTransport, NullLogger, QueuedLogger, SessionInfo, TelemetryConfig, TransportError,
};

/// Host daemon stub resolving a fixed client id for one mount
#[derive(Debug)]
struct StubHost {
    mount_path: PathBuf,
    client_id: String,
}

impl HostContext for StubHost {
    fn client_id(&self, mount_path: &Path) -> Option<String> {
        (mount_path == self.mount_path).then(|| self.client_id.clone())
    }
}

fn make_event(inode: u64) -> AccessEvent {
    AccessEvent::new(inode, AccessCause::Fuse, None, PathBuf::from("/mnt/repo"))
}

fn test_session() -> SessionInfo {
    SessionInfo {
        username: "alice".to_string(),
        hostname: "dev1234".to_string(),
        os: "linux".to_string(),
        os_version: "6.1.0".to_string(),
        client_version: "0.1.0".to_string(),
    }
}

fn enabled_config() -> ConfigHandle {
    ConfigHandle::new(TelemetryConfig::enabled())
}

async fn wait_for_len(transport: &MemoryTransport, len: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.len() < len {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("relay did not deliver in time");
}

#[tokio::test]
async fn test_records_are_enriched() {
    let transport = MemoryTransport::new();
    let host: Arc<dyn HostContext> = Arc::new(StubHost {
        mount_path: PathBuf::from("/mnt/repo"),
        client_id: "client-7".to_string(),
    });
    let weak: Weak<dyn HostContext> = Arc::downgrade(&host);

    let (logger, handle) =
        QueuedLogger::spawn(test_session(), enabled_config(), Some(weak), transport.clone());

    logger.log_access(AccessEvent::new(
        42,
        AccessCause::Prefetch,
        Some("glob prefetch".to_string()),
        PathBuf::from("/mnt/repo"),
    ));

    wait_for_len(&transport, 1).await;
    let record = &transport.records()[0];
    assert_eq!(record.inode, 42);
    assert_eq!(record.cause, AccessCause::Prefetch);
    assert_eq!(record.cause_detail.as_deref(), Some("glob prefetch"));
    assert_eq!(record.mount_path, PathBuf::from("/mnt/repo"));
    assert_eq!(record.session, test_session());
    assert_eq!(record.client_id.as_deref(), Some("client-7"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_host_death_tolerated_mid_stream() {
    let transport = MemoryTransport::new();
    let host: Arc<dyn HostContext> = Arc::new(StubHost {
        mount_path: PathBuf::from("/mnt/repo"),
        client_id: "client-7".to_string(),
    });
    let weak: Weak<dyn HostContext> = Arc::downgrade(&host);

    let (logger, handle) =
        QueuedLogger::spawn(test_session(), enabled_config(), Some(weak), transport.clone());

    logger.log_access(make_event(1));
    wait_for_len(&transport, 1).await;
    assert_eq!(transport.records()[0].client_id.as_deref(), Some("client-7"));

    // The host is torn down while the logger lives on; later records ship
    // unenriched instead of faulting.
    drop(host);
    logger.log_access(make_event(2));
    wait_for_len(&transport, 2).await;
    assert_eq!(transport.records()[1].client_id, None);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_logging_queued() {
    let transport = MemoryTransport::new();
    let config = ConfigHandle::new(TelemetryConfig {
        enabled: true,
        queue_capacity: 4096,
        ..TelemetryConfig::default()
    });
    let (logger, handle) =
        QueuedLogger::spawn(SessionInfo::default(), config, None, transport.clone());

    let logger = Arc::new(logger);
    std::thread::scope(|scope| {
        for inode in 0..100u64 {
            let logger = Arc::clone(&logger);
            scope.spawn(move || logger.log_access(make_event(inode)));
        }
    });

    wait_for_len(&transport, 100).await;
    assert_eq!(logger.dropped_events(), 0);

    let mut inodes: Vec<u64> = transport.records().iter().map(|r| r.inode).collect();
    inodes.sort_unstable();
    assert_eq!(inodes, (0..100).collect::<Vec<u64>>());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_logging_null() {
    let logger: Arc<dyn AccessLogger> = Arc::new(NullLogger::new());

    std::thread::scope(|scope| {
        for inode in 0..100u64 {
            let logger = Arc::clone(&logger);
            scope.spawn(move || logger.log_access(make_event(inode)));
        }
    });
}

#[tokio::test]
async fn test_null_scenario_with_no_context() {
    // Disabled logger built with no session info and no host reference.
    let logger = NullLogger::new();
    logger.log_access(AccessEvent::new(
        42,
        AccessCause::Prefetch,
        None,
        PathBuf::from("/mnt/repo"),
    ));
}

#[tokio::test]
async fn test_clone_logger_preserves_kind_through_trait_object() {
    let transport = MemoryTransport::new();
    let (logger, handle) = QueuedLogger::spawn(
        SessionInfo::default(),
        enabled_config(),
        None,
        transport.clone(),
    );

    let boxed: Box<dyn AccessLogger> = Box::new(logger);
    let sibling = boxed.clone_logger();

    sibling.log_access(make_event(9));
    wait_for_len(&transport, 1).await;
    assert_eq!(transport.records()[0].inode, 9);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_reload_flips_enablement_between_calls() {
    let transport = MemoryTransport::new();
    let config = ConfigHandle::new(TelemetryConfig::enabled());
    let (logger, handle) = QueuedLogger::spawn(
        SessionInfo::default(),
        config.clone(),
        None,
        transport.clone(),
    );

    logger.log_access(make_event(1));
    wait_for_len(&transport, 1).await;

    config.replace(TelemetryConfig::default());
    logger.log_access(make_event(2));

    config.replace(TelemetryConfig::enabled());
    logger.log_access(make_event(3));

    wait_for_len(&transport, 2).await;
    let inodes: Vec<u64> = transport.records().iter().map(|r| r.inode).collect();
    assert_eq!(inodes, vec![1, 3]);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_build_or_null_degrades_on_transport_failure() {
    let failed: Result<MemoryTransport, TransportError> = Err(TransportError::Closed);
    let (logger, handle) = build_or_null(SessionInfo::collect(), enabled_config(), None, failed);

    // Startup survives; the logger and its siblings accept calls inertly.
    assert!(handle.is_none());
    logger.log_access(make_event(1));
    logger.clone_logger().log_access(make_event(2));
}

#[tokio::test]
async fn test_build_or_null_spawns_active_variant() {
    let transport = MemoryTransport::new();
    let (logger, handle) = build_or_null(
        SessionInfo::default(),
        enabled_config(),
        None,
        Ok(transport.clone()),
    );

    logger.log_access(make_event(5));
    wait_for_len(&transport, 1).await;

    handle.expect("active variant has a relay").shutdown().await;
}
