//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`, level configurable per deployment
//! - Metrics are cheap atomic updates, exposed for Prometheus scrape
//! - Request ids flow through all log events via the trace layer

pub mod logging;
pub mod metrics;
