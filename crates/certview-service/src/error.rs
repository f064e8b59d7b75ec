//! Service error types.

use certview_core::ReferenceError;
use certview_store::StoreError;
use thiserror::Error;

/// The caller context cannot be turned into a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// An institutional caller supplied an organization id that is not a
    /// reference id.
    #[error("organization id {value:?} is not a valid reference id: {source}")]
    InvalidOrganizationId {
        value: String,
        #[source]
        source: ReferenceError,
    },
}

/// Failure of a typed service operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The store was unreachable or rejected the query.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store did not answer before the deadline.
    #[error("certificate store did not respond within {0:?}")]
    Timeout(std::time::Duration),

    /// The caller context could not be planned.
    #[error(transparent)]
    InvalidOrganizationId(#[from] QueryError),
}

impl ServiceError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(e) => e.kind(),
            Self::Timeout(_) => "timeout",
            Self::InvalidOrganizationId(_) => "invalid_organization_id",
        }
    }

    /// Whether the failure is the store's fault rather than the caller's.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Timeout(_))
    }
}
