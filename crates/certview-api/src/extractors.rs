//! # Caller Extractor
//!
//! certview sits behind a gateway that has already authenticated the
//! caller and forwards their claims as headers. This extractor turns those
//! headers into a [`CallerContext`]; it makes no authorization decision.
//!
//! | Header              | Field                  |
//! |---------------------|------------------------|
//! | `x-caller-role`     | role (default `USER`)  |
//! | `x-caller-email`    | email                  |
//! | `x-caller-id`       | user id                |
//! | `x-organization-id` | organization id        |
//! | `x-caller-name`     | display name           |

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use certview_core::CallerContext;

use crate::error::AppError;

pub const ROLE_HEADER: &str = "x-caller-role";
pub const EMAIL_HEADER: &str = "x-caller-email";
pub const USER_ID_HEADER: &str = "x-caller-id";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const NAME_HEADER: &str = "x-caller-name";

/// Caller context read from gateway headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub CallerContext);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        caller_from_headers(&parts.headers).map(Caller)
    }
}

/// Build a caller context from request headers. Blank headers are absent;
/// non-UTF-8 headers are rejected.
pub fn caller_from_headers(headers: &HeaderMap) -> Result<CallerContext, AppError> {
    let role = header(headers, ROLE_HEADER)?;
    let email = header(headers, EMAIL_HEADER)?;
    let user_id = header(headers, USER_ID_HEADER)?;
    let organization_id = header(headers, ORGANIZATION_HEADER)?;

    let mut caller = CallerContext::from_claims(role, email, user_id, organization_id);
    if let Some(name) = header(headers, NAME_HEADER)? {
        caller = caller.with_display_name(name);
    }
    Ok(caller)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|v| {
            std::str::from_utf8(v.as_bytes())
                .map_err(|_| AppError::BadRequest(format!("header {name} is not valid UTF-8")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use certview_core::Role;

    #[test]
    fn missing_headers_mean_anonymous_individual() {
        let caller = caller_from_headers(&HeaderMap::new()).unwrap();
        assert_eq!(caller, CallerContext::new(Role::Student));
        assert_eq!(caller.subject_name(), "User");
    }

    #[test]
    fn all_headers_are_read() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("admin"));
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("registrar@x.edu"));
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u-9"));
        headers.insert(
            ORGANIZATION_HEADER,
            HeaderValue::from_static("507f1f77bcf86cd799439011"),
        );
        headers.insert(NAME_HEADER, HeaderValue::from_static("Registrar"));

        let caller = caller_from_headers(&headers).unwrap();
        assert_eq!(caller.role, Role::Admin);
        assert_eq!(caller.email.as_deref(), Some("registrar@x.edu"));
        assert_eq!(caller.user_id.as_deref(), Some("u-9"));
        assert_eq!(
            caller.organization_id.as_deref(),
            Some("507f1f77bcf86cd799439011")
        );
        assert_eq!(caller.subject_name(), "Registrar");
    }

    #[test]
    fn blank_headers_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("   "));
        headers.insert(NAME_HEADER, HeaderValue::from_static(""));
        let caller = caller_from_headers(&headers).unwrap();
        assert!(caller.email.is_none());
        assert!(caller.display_name.is_none());
    }

    #[test]
    fn utf8_names_are_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            NAME_HEADER,
            HeaderValue::from_bytes("José Núñez".as_bytes()).unwrap(),
        );
        let caller = caller_from_headers(&headers).unwrap();
        assert_eq!(caller.subject_name(), "José Núñez");
    }

    #[test]
    fn non_utf8_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(EMAIL_HEADER, HeaderValue::from_bytes(b"\xffa@x.edu").unwrap());
        let err = caller_from_headers(&headers).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains(EMAIL_HEADER)));
    }
}
