//! Metrics collection and exposition.
//!
//! # Metrics
//! - `temploco_requests_total` (counter): requests by route name and status
//! - `temploco_render_duration_seconds` (histogram): dispatch and render time by route
//!
//! # Design Decisions
//! - Route names, not raw paths, are used as labels to bound cardinality
//! - Unmatched requests are labelled `none`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "temploco_requests_total";
pub const RENDER_DURATION: &str = "temploco_render_duration_seconds";

/// Label used when no route matched.
pub const NO_ROUTE: &str = "none";

/// Install the Prometheus recorder and its scrape listener. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        REQUESTS_TOTAL,
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(RENDER_DURATION, "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}
