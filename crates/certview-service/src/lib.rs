//! # certview-service — Certificate Query Service
//!
//! Turns a caller's identity into a role-scoped store query, runs it under a
//! deadline, and normalizes what comes back. Also composes the per-caller
//! text summary.
//!
//! ## Layers
//!
//! - [`plan_query`]: pure filter construction. Which branch applies is
//!   decided by role alone; see the table in [`plan`].
//! - [`CertificateService::fetch_certificates`] and friends: typed
//!   operations returning [`ServiceError`], so callers can tell "no
//!   matches" apart from "store unavailable".
//! - [`CertificateService::get_certificates`] and friends: boundary
//!   operations that never fail. Each converts a [`ServiceError`] into the
//!   safe default (empty list, `None`, fixed error text) and logs exactly
//!   one error line naming the failure kind.
//!
//! ## Crate Policy
//!
//! - Store access only through the injected `certview-store` traits.
//! - No HTTP types. The API crate maps [`ServiceError`] to responses.

pub mod error;
pub mod plan;
pub mod service;

pub use error::{QueryError, ServiceError};
pub use plan::{plan_query, QueryPlan, QueryScope};
pub use service::CertificateService;
