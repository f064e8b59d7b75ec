//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec.
//! Serves at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "certview API",
        version = "0.1.0",
        description = "Role-scoped read API over issued certificates.\n\nThe caller's role, email, user id and organization arrive as headers from an authenticating gateway. MOE callers see every certificate, institution admins see their institution's, everyone else sees their own.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::certificates::list_certificates,
        crate::routes::certificates::certificate_summary,
        crate::routes::students::get_student,
    ),
    components(schemas(
        certview_core::CanonicalCertificateRecord,
        certview_core::StudentProfile,
        crate::routes::certificates::CertificateListResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "certificates", description = "Certificate listing and summaries"),
        (name = "students", description = "Student academic profiles"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        for expected in [
            "/v1/certificates",
            "/v1/certificates/summary",
            "/v1/students/{student_id}",
        ] {
            assert!(
                spec.paths.paths.contains_key(expected),
                "missing {expected}, have {paths:?}"
            );
        }
    }

    #[test]
    fn document_has_record_schema() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("CanonicalCertificateRecord"));
        assert!(schemas.contains_key("ErrorBody"));
    }

    #[test]
    fn document_serializes_to_json() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("\"openapi\""));
        assert!(json.contains("certview API"));
    }
}
