//! Store capability traits.
//!
//! Implementations must be `Send + Sync` so they can be shared across async
//! tasks behind an `Arc`. Both traits are object-safe to support runtime
//! backend selection.

use async_trait::async_trait;
use certview_core::Document;

use crate::error::StoreError;
use crate::filter::Filter;

/// Read access to the certificate collection.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Return up to `limit` documents matching `filter`, in store order.
    async fn find_certificates(
        &self,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Read access to the student-profile collection.
#[async_trait]
pub trait StudentProfileStore: Send + Sync {
    /// Look up the profile whose `student_id` equals `student_id`.
    async fn find_student_profile(&self, student_id: &str)
        -> Result<Option<Document>, StoreError>;
}
