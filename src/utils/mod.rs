//! # Utility Modules
//!
//! Supporting utilities for logging and metrics.
//!
//! ## Components
//! - **Logging**: `tracing-subscriber` setup from `LoggingConfig`
//! - **Metrics**: thread-safe encoder counters

pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, EncoderMetrics, MetricsSnapshot};
