//! Metrics Adapter - Prometheus Observability

pub mod prometheus;

pub use prometheus::ApiMetrics;
