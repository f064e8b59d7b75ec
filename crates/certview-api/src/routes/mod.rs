//! # API Route Modules
//!
//! - `certificates` — role-scoped certificate listing and the plain-text
//!   summary.
//! - `students` — student academic profile lookup.
//!
//! Every route reads the caller from gateway headers via
//! [`crate::extractors::Caller`] and delegates to
//! [`certview_service::CertificateService`].

pub mod certificates;
pub mod students;
