//! # certview-api — Axum API Service for certview
//!
//! HTTP surface over [`certview_service::CertificateService`]. The caller's
//! identity is taken from gateway headers; this service makes no
//! authentication or authorization decision of its own.
//!
//! ## API Surface
//!
//! | Route                          | Module                      |
//! |--------------------------------|-----------------------------|
//! | `GET /v1/certificates`         | [`routes::certificates`]    |
//! | `GET /v1/certificates/summary` | [`routes::certificates`]    |
//! | `GET /v1/students/{student_id}`| [`routes::students`]        |
//! | `GET /openapi.json`            | [`openapi`]                 |
//! | `GET /health/*`, `GET /metrics`| this module                 |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers. Query planning, normalization and
//!   rendering live in the service and core crates.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the request metrics so
/// scrapes do not count themselves. `/metrics` exists only when a
/// Prometheus handle is attached to the state.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::certificates::router())
        .merge(routes::students::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if state.metrics.is_some() {
        probes = probes.route("/metrics", axum::routing::get(prometheus_metrics));
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 "ready" when the certificate store answers a ping
/// within the service deadline, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.ping().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!(
                backend = state.service.backend_name(),
                kind = e.kind(),
                error = %e,
                "certificate store health check failed"
            );
            (StatusCode::SERVICE_UNAVAILABLE, "certificate store unreachable").into_response()
        }
    }
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
