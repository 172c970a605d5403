//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! service / pool / producer
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint
//! ```
//!
//! Private keys never appear in log fields.

pub mod logging;
pub mod metrics;
