//! Metric registry bridge.
//!
//! Instruments live in a `prometheus::Registry` owned by the aggregator
//! instance (never the process-global default registry), so several
//! independent signaling instances can be tracked in one process.

pub mod metrics;

pub use metrics::{exponential_buckets, MetricsRegistry};
