//! # certview-core — Foundational Types for certview
//!
//! Leaf crate of the workspace. Defines the caller context, the store's
//! native reference identifier, the raw (schema-inconsistent) certificate
//! document model, the canonical certificate record, and the two pure
//! transformations over them: record normalization and summary rendering.
//!
//! ## Key Design Principles
//!
//! 1. **Typed view over heterogeneous documents.** Certificate documents
//!    carry the same fact under legacy and current key spellings. All
//!    string-keyed lookups live in [`RawCertificateDocument`]; the rest of
//!    the stack talks in typed accessors.
//!
//! 2. **Total normalization.** [`normalize`] never fails. A missing field is
//!    an explicit `None` (or the `"N/A"` placeholder for issue dates), never
//!    an error.
//!
//! 3. **Validated reference ids.** [`ReferenceId`] can only be built through
//!    [`ReferenceId::parse`]; a malformed identifier is a typed value the
//!    caller decides how to handle.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `certview-*` crates (this is the leaf of the DAG).
//! - No I/O. The store and HTTP layers live in downstream crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod caller;
pub mod document;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod record;
pub mod reference;
pub mod summary;

// Re-export primary types for ergonomic imports.
pub use caller::{CallerContext, Role};
pub use document::{DocValue, Document, RawCertificateDocument, StudentSection};
pub use error::ReferenceError;
pub use normalize::normalize;
pub use profile::StudentProfile;
pub use record::CanonicalCertificateRecord;
pub use reference::ReferenceId;
pub use summary::{render, render_with_profile};
