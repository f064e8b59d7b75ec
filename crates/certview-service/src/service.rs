//! # Certificate Service
//!
//! Owns no connections. The certificate and profile stores are injected at
//! construction and every call to them runs under the service deadline.
//!
//! Two API levels share one implementation:
//!
//! - `fetch_*` return `Result<_, ServiceError>`.
//! - `get_*` take raw caller claims, never fail, and log one error line per
//!   caught failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use certview_core::normalize::normalize_all;
use certview_core::summary::{self, failure_message};
use certview_core::{CallerContext, CanonicalCertificateRecord, Role, StudentProfile};
use certview_store::{CertificateStore, StoreError, StudentProfileStore};

use crate::error::ServiceError;
use crate::plan::plan_query;

/// Role-scoped read access to certificates and student profiles.
#[derive(Clone)]
pub struct CertificateService {
    certificates: Arc<dyn CertificateStore>,
    profiles: Arc<dyn StudentProfileStore>,
    deadline: Duration,
}

impl std::fmt::Debug for CertificateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateService")
            .field("backend", &self.certificates.backend_name())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl CertificateService {
    /// Deadline used when none is configured.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        profiles: Arc<dyn StudentProfileStore>,
        deadline: Duration,
    ) -> Self {
        Self {
            certificates,
            profiles,
            deadline,
        }
    }

    /// Build a service over one backend that serves both collections.
    pub fn with_store<S>(store: Arc<S>, deadline: Duration) -> Self
    where
        S: CertificateStore + StudentProfileStore + 'static,
    {
        Self::new(store.clone(), store, deadline)
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn backend_name(&self) -> &'static str {
        self.certificates.backend_name()
    }

    /// Check that the certificate store answers within the deadline.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.within(self.certificates.ping()).await
    }

    // -- Typed operations -----------------------------------------------------

    /// Certificates visible to `caller`, normalized, in store order.
    pub async fn fetch_certificates(
        &self,
        caller: &CallerContext,
    ) -> Result<Vec<CanonicalCertificateRecord>, ServiceError> {
        let plan = plan_query(caller)?;
        metrics::counter!(
            "certview_certificate_queries_total",
            "role" => caller.role.as_str()
        )
        .increment(1);

        let docs = self
            .within(self.certificates.find_certificates(&plan.filter, plan.limit))
            .await?;

        tracing::debug!(
            role = %caller.role,
            scope = plan.scope.as_str(),
            limit = plan.limit,
            returned = docs.len(),
            "certificate query served"
        );
        Ok(normalize_all(&docs))
    }

    /// Academic profile for `student_id`, if one is stored.
    pub async fn fetch_student_record(
        &self,
        student_id: &str,
    ) -> Result<Option<StudentProfile>, ServiceError> {
        let doc = self
            .within(self.profiles.find_student_profile(student_id))
            .await?;
        Ok(doc.as_ref().map(StudentProfile::from_document))
    }

    /// Rendered summary for `caller`.
    ///
    /// Individual callers with a user id also get their academic profile
    /// block. The profile is best-effort: if that lookup fails the summary
    /// is rendered without it.
    pub async fn fetch_summary(&self, caller: &CallerContext) -> Result<String, ServiceError> {
        let records = self.fetch_certificates(caller).await?;

        let profile = match (caller.role, caller.user_id.as_deref()) {
            (Role::Student, Some(user_id)) => match self.fetch_student_record(user_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(
                        kind = e.kind(),
                        error = %e,
                        "student profile unavailable; rendering summary without it"
                    );
                    None
                }
            },
            _ => None,
        };

        Ok(summary::render_with_profile(
            caller.role,
            caller.subject_name(),
            &records,
            profile.as_ref(),
        ))
    }

    // -- Boundary operations --------------------------------------------------

    /// Certificates for raw caller claims. Any failure yields an empty list.
    ///
    /// A malformed organization id is ordinary input variance: it is logged
    /// at warn and yields an empty list, never an error line.
    pub async fn get_certificates(
        &self,
        role: &str,
        email: Option<&str>,
        user_id: Option<&str>,
        organization_id: Option<&str>,
    ) -> Vec<CanonicalCertificateRecord> {
        let caller = CallerContext::from_claims(Some(role), email, user_id, organization_id);
        match self.fetch_certificates(&caller).await {
            Ok(records) => records,
            Err(e @ ServiceError::InvalidOrganizationId(_)) => {
                log_rejected_input("get_certificates", &e);
                Vec::new()
            }
            Err(e) => {
                log_failure("get_certificates", &e);
                Vec::new()
            }
        }
    }

    /// Profile lookup. Any failure yields `None`.
    pub async fn get_student_record(&self, student_id: &str) -> Option<StudentProfile> {
        match self.fetch_student_record(student_id).await {
            Ok(profile) => profile,
            Err(e) => {
                log_failure("get_student_record", &e);
                None
            }
        }
    }

    /// Summary text for raw caller claims.
    ///
    /// A malformed organization id renders the ordinary zero-count summary.
    /// A store failure or timeout yields the fixed text
    /// `Error retrieving data for {name}`, not a zero-count summary.
    pub async fn get_summary(
        &self,
        role: &str,
        email: Option<&str>,
        name: &str,
        user_id: Option<&str>,
        organization_id: Option<&str>,
    ) -> String {
        let caller = CallerContext::from_claims(Some(role), email, user_id, organization_id)
            .with_display_name(name);
        match self.fetch_summary(&caller).await {
            Ok(text) => text,
            Err(e @ ServiceError::InvalidOrganizationId(_)) => {
                log_rejected_input("get_summary", &e);
                summary::render(caller.role, caller.subject_name(), &[])
            }
            Err(e) => {
                log_failure("get_summary", &e);
                failure_message(caller.subject_name())
            }
        }
    }

    // -- Internals ------------------------------------------------------------

    async fn within<T, F>(&self, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let outcome = match tokio::time::timeout(self.deadline, call).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => ServiceError::Store(e),
            Err(_) => ServiceError::Timeout(self.deadline),
        };
        metrics::counter!("certview_store_failures_total", "kind" => outcome.kind()).increment(1);
        Err(outcome)
    }
}

fn log_failure(operation: &'static str, err: &ServiceError) {
    tracing::error!(operation, kind = err.kind(), error = %err, "certificate service call failed");
}

fn log_rejected_input(operation: &'static str, err: &ServiceError) {
    tracing::warn!(operation, kind = err.kind(), error = %err, "caller claims rejected; serving no records");
}

#[cfg(test)]
mod tests {
    use super::*;
    use certview_core::Document;
    use certview_store::MemoryStore;

    fn service(store: MemoryStore) -> CertificateService {
        CertificateService::with_store(Arc::new(store), Duration::from_secs(5))
    }

    fn cert(id: &str, email: &str, name: &str) -> Document {
        Document::new()
            .with("certificateId", id)
            .with("studentEmail", email)
            .with("student_name", name)
            .with("course_name", "B.Tech")
    }

    #[tokio::test]
    async fn individual_sees_only_own_certificates() {
        let svc = service(MemoryStore::with_certificates(vec![
            cert("C1", "a@x.edu", "Asha"),
            cert("C2", "b@x.edu", "Bilal"),
        ]));
        let caller = CallerContext::new(Role::Student).with_email("a@x.edu");
        let records = svc.fetch_certificates(&caller).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].certificate_id.as_deref(), Some("C1"));
    }

    #[tokio::test]
    async fn student_record_is_built_from_profile_document() {
        let store = MemoryStore::new();
        store.insert_profile(
            Document::new()
                .with("student_id", "stu-1")
                .with("enrollment_number", "EN-7"),
        );
        let svc = service(store);
        let profile = svc.get_student_record("stu-1").await.unwrap();
        assert_eq!(profile.enrollment_number.as_deref(), Some("EN-7"));
        assert!(svc.get_student_record("stu-2").await.is_none());
    }

    #[tokio::test]
    async fn summary_includes_profile_for_individual_with_user_id() {
        let store = MemoryStore::new();
        store.insert_certificate(
            Document::new()
                .with("certificateId", "C1")
                .with("student_id", "stu-1"),
        );
        store.insert_profile(
            Document::new()
                .with("student_id", "stu-1")
                .with("enrollment_number", "EN-7"),
        );
        let svc = service(store);
        let text = svc
            .get_summary("USER", None, "Asha", Some("stu-1"), None)
            .await;
        assert!(text.starts_with("Student Profile for Asha:"), "got: {text}");
        assert!(text.contains("Enrollment Number: EN-7"), "got: {text}");
        assert!(text.contains("Certificates Issued: 1"), "got: {text}");
    }

    #[tokio::test]
    async fn invalid_organization_id_yields_empty_list_at_boundary() {
        let svc = service(MemoryStore::with_certificates(vec![cert("C1", "a@x.edu", "Asha")]));
        let records = svc
            .get_certificates("ADMIN", None, None, Some("not-a-reference"))
            .await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn invalid_organization_id_renders_zero_count_summary() {
        let svc = service(MemoryStore::with_certificates(vec![cert("C1", "a@x.edu", "Asha")]));
        let text = svc
            .get_summary("ADMIN", None, "Registrar", None, Some("org-42"))
            .await;
        assert!(!text.starts_with("Error retrieving data"), "got: {text}");
        assert!(text.contains("Registrar"), "got: {text}");
        assert!(text.contains("Total Certificates Issued: 0"), "got: {text}");
    }

    #[test]
    fn debug_names_backend_and_deadline() {
        let svc = service(MemoryStore::new());
        let debug = format!("{svc:?}");
        assert!(debug.contains("memory"), "got: {debug}");
        assert!(debug.contains("5s"), "got: {debug}");
    }
}
