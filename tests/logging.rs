//! Subscriber installation and the global metrics wiring.
//!
//! Lives in its own test binary: a process can install only one global
//! subscriber.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use interchain_query::config::LoggingConfig;
use interchain_query::prelude::*;
use interchain_query::utils::logging::init_logging;
use interchain_query::utils::metrics::{global_metrics, init_metrics};
use tracing::Level;

fn packet(path: &str) -> Vec<u8> {
    let data = serialize_query(&[QueryRequest::new(path, b"addr".to_vec())]).unwrap();
    InterchainQueryPacketData::new(data, "").to_bytes().unwrap()
}

#[test]
fn test_file_logging_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("host.log");

    let config = LoggingConfig {
        app_name: "icq-test".to_string(),
        log_level: Level::DEBUG,
        log_to_console: false,
        log_to_file: true,
        log_file_path: Some(log_path.to_string_lossy().into_owned()),
        json_format: true,
    };
    assert!(config.validate().is_empty());
    init_logging(&config).unwrap();
    init_metrics();

    // a second subscriber cannot be installed
    assert!(init_logging(&config).is_err());

    let router = QueryRouter::new().with_gas_per_query(1);
    router.register("/svc/Echo", |data, _| Ok(data.to_vec())).unwrap();
    let params = HostParams::new(true, ["/svc/Echo"]);

    let before = global_metrics().snapshot();
    assert!(process_packet(&packet("/svc/Echo"), &params, &router, 100).is_acknowledged());
    assert!(process_packet(&packet("/svc/Other"), &params, &router, 100).is_rejected());
    assert!(process_packet(&packet("/svc/Echo"), &params, &router, 0).is_aborted());
    let after = global_metrics().snapshot();

    assert_eq!(after.packets_received - before.packets_received, 3);
    assert_eq!(after.packets_acknowledged - before.packets_acknowledged, 1);
    assert_eq!(after.rejected_unauthorized - before.rejected_unauthorized, 1);
    assert_eq!(after.packets_aborted - before.packets_aborted, 1);
    assert!(after.queries_executed > before.queries_executed);
    global_metrics().log_metrics();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("Rejecting unauthorized batch"));
    assert!(contents.contains("Gas exhausted"));
    assert!(contents.lines().all(|line| line.starts_with('{')));
}
