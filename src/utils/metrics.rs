//! Observability and Metrics
//!
//! Counters for packet handling on the host: how many packets arrived, how
//! they ended, how many queries ran and how much gas they burned.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::error::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for host operations
#[derive(Debug)]
pub struct Metrics {
    /// Total packets received
    pub packets_received: AtomicU64,
    /// Total packet bytes received
    pub bytes_received: AtomicU64,
    /// Packets that produced a success acknowledgement
    pub packets_acknowledged: AtomicU64,
    /// Packets rejected because they could not be decoded
    pub rejected_decode: AtomicU64,
    /// Packets rejected by the allow-list or query restrictions
    pub rejected_unauthorized: AtomicU64,
    /// Packets rejected because a query failed
    pub rejected_execution: AtomicU64,
    /// Packets rejected for any other reason
    pub rejected_other: AtomicU64,
    /// Packets aborted on gas exhaustion
    pub packets_aborted: AtomicU64,
    /// Individual queries executed successfully
    pub queries_executed: AtomicU64,
    /// Total gas consumed across packets
    pub gas_consumed: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            packets_received: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            packets_acknowledged: AtomicU64::new(0),
            rejected_decode: AtomicU64::new(0),
            rejected_unauthorized: AtomicU64::new(0),
            rejected_execution: AtomicU64::new(0),
            rejected_other: AtomicU64::new(0),
            packets_aborted: AtomicU64::new(0),
            queries_executed: AtomicU64::new(0),
            gas_consumed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a packet received
    pub fn packet_received(&self, byte_count: u64) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a success acknowledgement
    pub fn packet_acknowledged(&self) {
        self.packets_acknowledged.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected packet
    pub fn packet_rejected(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::Decode => &self.rejected_decode,
            ErrorKind::Unauthorized => &self.rejected_unauthorized,
            ErrorKind::Execution => &self.rejected_execution,
            ErrorKind::Validation | ErrorKind::Internal => &self.rejected_other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a packet aborted on gas exhaustion
    pub fn packet_aborted(&self) {
        self.packets_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully executed query
    pub fn query_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record gas consumed by one packet
    pub fn gas_consumed(&self, gas: u64) {
        self.gas_consumed.fetch_add(gas, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            packets_acknowledged: self.packets_acknowledged.load(Ordering::Relaxed),
            rejected_decode: self.rejected_decode.load(Ordering::Relaxed),
            rejected_unauthorized: self.rejected_unauthorized.load(Ordering::Relaxed),
            rejected_execution: self.rejected_execution.load(Ordering::Relaxed),
            rejected_other: self.rejected_other.load(Ordering::Relaxed),
            packets_aborted: self.packets_aborted.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            gas_consumed: self.gas_consumed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_received = snapshot.packets_received,
            bytes_received = snapshot.bytes_received,
            packets_acknowledged = snapshot.packets_acknowledged,
            rejected_decode = snapshot.rejected_decode,
            rejected_unauthorized = snapshot.rejected_unauthorized,
            rejected_execution = snapshot.rejected_execution,
            rejected_other = snapshot.rejected_other,
            packets_aborted = snapshot.packets_aborted,
            queries_executed = snapshot.queries_executed,
            gas_consumed = snapshot.gas_consumed,
            uptime_seconds = snapshot.uptime_seconds,
            "Host metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub packets_received: u64,
    pub bytes_received: u64,
    pub packets_acknowledged: u64,
    pub rejected_decode: u64,
    pub rejected_unauthorized: u64,
    pub rejected_execution: u64,
    pub rejected_other: u64,
    pub packets_aborted: u64,
    pub queries_executed: u64,
    pub gas_consumed: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Rejections of every kind
    pub fn packets_rejected(&self) -> u64 {
        self.rejected_decode + self.rejected_unauthorized + self.rejected_execution + self.rejected_other
    }
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Initialize metrics collection (call once at startup)
pub fn init_metrics() {
    let _ = global_metrics();
    info!("Metrics collection initialized");
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_bucketed_by_kind() {
        let metrics = Metrics::new();
        metrics.packet_rejected(ErrorKind::Decode);
        metrics.packet_rejected(ErrorKind::Unauthorized);
        metrics.packet_rejected(ErrorKind::Unauthorized);
        metrics.packet_rejected(ErrorKind::Internal);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rejected_decode, 1);
        assert_eq!(snapshot.rejected_unauthorized, 2);
        assert_eq!(snapshot.rejected_execution, 0);
        assert_eq!(snapshot.packets_rejected(), 4);
    }

    #[test]
    fn test_received_counts_bytes() {
        let metrics = Metrics::new();
        metrics.packet_received(10);
        metrics.packet_received(5);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_received, 2);
        assert_eq!(snapshot.bytes_received, 15);
    }
}
