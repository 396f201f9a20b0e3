//! Observability and Metrics
//!
//! Counters for encoder activity. Uses atomic counters for thread-safe collection,
//! so concurrent `serialize` calls can record into the same instance.

use crate::error::ProtocolError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for encoding operations
#[derive(Debug)]
pub struct EncoderMetrics {
    /// Packets encoded successfully
    pub packets_encoded: AtomicU64,
    /// Total bytes produced by successful encodings
    pub bytes_encoded: AtomicU64,
    /// Packets encoded through their full-bypass hook
    pub custom_encodings: AtomicU64,
    /// Failed encodings of any kind
    pub failures_total: AtomicU64,
    pub missing_identifier: AtomicU64,
    pub malformed_rule_map: AtomicU64,
    pub unsupported_key_type: AtomicU64,
    pub unbounded_recursion: AtomicU64,
    start_time: Instant,
}

impl EncoderMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            packets_encoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            custom_encodings: AtomicU64::new(0),
            failures_total: AtomicU64::new(0),
            missing_identifier: AtomicU64::new(0),
            malformed_rule_map: AtomicU64::new(0),
            unsupported_key_type: AtomicU64::new(0),
            unbounded_recursion: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful encoding
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a packet encoded by its full-bypass hook
    pub fn custom_encoding(&self) {
        self.custom_encodings.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed encoding
    pub fn encode_failed(&self, error: &ProtocolError) {
        self.failures_total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            ProtocolError::MissingIdentifier(_) => &self.missing_identifier,
            ProtocolError::MalformedRuleMap(_) => &self.malformed_rule_map,
            ProtocolError::UnsupportedKeyType(_) => &self.unsupported_key_type,
            ProtocolError::UnboundedRecursion { .. } => &self.unbounded_recursion,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            custom_encodings: self.custom_encodings.load(Ordering::Relaxed),
            failures_total: self.failures_total.load(Ordering::Relaxed),
            missing_identifier: self.missing_identifier.load(Ordering::Relaxed),
            malformed_rule_map: self.malformed_rule_map.load(Ordering::Relaxed),
            unsupported_key_type: self.unsupported_key_type.load(Ordering::Relaxed),
            unbounded_recursion: self.unbounded_recursion.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_encoded = snapshot.packets_encoded,
            bytes_encoded = snapshot.bytes_encoded,
            custom_encodings = snapshot.custom_encodings,
            failures_total = snapshot.failures_total,
            missing_identifier = snapshot.missing_identifier,
            malformed_rule_map = snapshot.malformed_rule_map,
            unsupported_key_type = snapshot.unsupported_key_type,
            unbounded_recursion = snapshot.unbounded_recursion,
            uptime_seconds = snapshot.uptime_seconds,
            "Encoder metrics snapshot"
        );
    }
}

impl Default for EncoderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub packets_encoded: u64,
    pub bytes_encoded: u64,
    pub custom_encodings: u64,
    pub failures_total: u64,
    pub missing_identifier: u64,
    pub malformed_rule_map: u64,
    pub unsupported_key_type: u64,
    pub unbounded_recursion: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<EncoderMetrics> =
    once_cell::sync::Lazy::new(EncoderMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static EncoderMetrics {
    &METRICS
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
