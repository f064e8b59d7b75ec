//! # Certificate Routes
//!
//! `GET /v1/certificates` returns the normalized certificates visible to the
//! caller. Unlike the service's boundary operations it does not hide store
//! failures: an outage or timeout is a 503, so clients can tell it apart
//! from an empty result.
//!
//! `GET /v1/certificates/summary` returns the caller's plain-text summary.
//! It follows the summary contract: failures produce the fixed
//! `Error retrieving data for {name}` text.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use certview_core::CanonicalCertificateRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::Caller;
use crate::state::AppState;

/// Certificate listing response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateListResponse {
    /// Number of certificates returned (after the role's result cap).
    pub count: usize,
    pub certificates: Vec<CanonicalCertificateRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/certificates", get(list_certificates))
        .route("/v1/certificates/summary", get(certificate_summary))
}

/// GET /v1/certificates — certificates visible to the caller.
#[utoipa::path(
    get,
    path = "/v1/certificates",
    params(
        ("x-caller-role" = Option<String>, Header, description = "USER, ADMIN, INSTITUTION or MOE"),
        ("x-caller-email" = Option<String>, Header, description = "Caller email"),
        ("x-caller-id" = Option<String>, Header, description = "Caller user id"),
        ("x-organization-id" = Option<String>, Header, description = "Institution reference id"),
    ),
    responses(
        (status = 200, description = "Certificates visible to the caller", body = CertificateListResponse),
        (status = 400, description = "Caller header is not valid UTF-8", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed organization id", body = crate::error::ErrorBody),
        (status = 503, description = "Certificate store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub(crate) async fn list_certificates(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<CertificateListResponse>, AppError> {
    let certificates = state.service.fetch_certificates(&caller).await?;
    Ok(Json(CertificateListResponse {
        count: certificates.len(),
        certificates,
    }))
}

/// GET /v1/certificates/summary — plain-text summary for the caller.
#[utoipa::path(
    get,
    path = "/v1/certificates/summary",
    params(
        ("x-caller-role" = Option<String>, Header, description = "USER, ADMIN, INSTITUTION or MOE"),
        ("x-caller-email" = Option<String>, Header, description = "Caller email"),
        ("x-caller-id" = Option<String>, Header, description = "Caller user id"),
        ("x-organization-id" = Option<String>, Header, description = "Institution reference id"),
        ("x-caller-name" = Option<String>, Header, description = "Name shown in the summary"),
    ),
    responses(
        (status = 200, description = "Summary text", body = String, content_type = "text/plain"),
        (status = 400, description = "Caller header is not valid UTF-8", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub(crate) async fn certificate_summary(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> impl IntoResponse {
    let text = state
        .service
        .get_summary(
            caller.role.as_str(),
            caller.email.as_deref(),
            caller.subject_name(),
            caller.user_id.as_deref(),
            caller.organization_id.as_deref(),
        )
        .await;
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}
