//! # Prometheus Metrics
//!
//! Request metrics are recorded through the `metrics` facade. A Prometheus
//! recorder is installed once in `main`; its handle renders the exposition
//! text on each `/metrics` scrape. Without an installed recorder the
//! macros are no-ops.
//!
//! ## Counters
//! - `certview_http_requests_total` by method, route, status
//! - `certview_certificate_queries_total` by role (recorded by the service)
//! - `certview_store_failures_total` by kind (recorded by the service)
//!
//! ## Histograms
//! - `certview_http_request_duration_seconds` by method, route

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and return its render handle.
///
/// Call at most once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Middleware that records request count and latency.
///
/// Routes are labelled by their matched pattern (`/v1/students/{student_id}`)
/// rather than the raw URI, so ids do not create new series.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "certview_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "certview_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}
