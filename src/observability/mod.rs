//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and render latency)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for machines)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every request span through the trace layer
//! - Metrics are cheap (atomic increments); recording without an exporter is a no-op

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LoggingError};
