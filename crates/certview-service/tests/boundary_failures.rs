//! # Boundary Failure Handling
//!
//! Store outages and slow stores must reach boundary callers as safe
//! defaults with exactly one error log line, while the typed operations
//! report what actually happened.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certview_core::{CallerContext, Document, Role};
use certview_service::{CertificateService, ServiceError};
use certview_store::{CertificateStore, Filter, StoreError, StudentProfileStore};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Store whose every call fails as if the server were down.
struct UnreachableStore;

#[async_trait]
impl CertificateStore for UnreachableStore {
    async fn find_certificates(&self, _: &Filter, _: usize) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

#[async_trait]
impl StudentProfileStore for UnreachableStore {
    async fn find_student_profile(&self, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }
}

/// Store that never answers in time.
struct HangingStore;

#[async_trait]
impl CertificateStore for HangingStore {
    async fn find_certificates(&self, _: &Filter, _: usize) -> Result<Vec<Document>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "hanging"
    }
}

#[async_trait]
impl StudentProfileStore for HangingStore {
    async fn find_student_profile(&self, _: &str) -> Result<Option<Document>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}

/// Counts ERROR-level events seen by the subscriber it is attached to.
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn unreachable_service() -> CertificateService {
    CertificateService::with_store(Arc::new(UnreachableStore), Duration::from_secs(5))
}

fn hanging_service() -> CertificateService {
    CertificateService::with_store(Arc::new(HangingStore), Duration::from_millis(50))
}

fn capture_errors() -> (ErrorCounter, tracing::subscriber::DefaultGuard) {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}

// -- Boundary operations -----------------------------------------------------

#[tokio::test]
async fn store_failure_yields_empty_list_and_one_error_line() {
    let (errors, _guard) = capture_errors();
    let svc = unreachable_service();

    let records = svc.get_certificates("USER", Some("a@x.edu"), None, None).await;

    assert!(records.is_empty());
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn store_failure_on_each_branch_logs_once() {
    let (errors, _guard) = capture_errors();
    let svc = unreachable_service();

    svc.get_certificates("MOE", None, None, None).await;
    svc.get_certificates("ADMIN", None, None, Some("507f1f77bcf86cd799439011"))
        .await;
    svc.get_certificates("USER", None, Some("abc123"), None).await;

    assert_eq!(errors.count(), 3);
}

#[tokio::test]
async fn student_record_failure_yields_none_and_one_error_line() {
    let (errors, _guard) = capture_errors();
    let svc = unreachable_service();

    assert!(svc.get_student_record("stu-1").await.is_none());
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn summary_failure_yields_fixed_message() {
    let (errors, _guard) = capture_errors();
    let svc = unreachable_service();

    let text = svc.get_summary("MOE", None, "Director", None, None).await;

    assert_eq!(text, "Error retrieving data for Director");
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn hanging_store_times_out_to_empty_list() {
    let (errors, _guard) = capture_errors();
    let svc = hanging_service();

    let records = svc.get_certificates("MOE", None, None, None).await;

    assert!(records.is_empty());
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn unparseable_user_id_is_not_logged_as_error() {
    let (errors, _guard) = capture_errors();
    let svc = CertificateService::with_store(
        Arc::new(certview_store::MemoryStore::new()),
        Duration::from_secs(5),
    );

    let records = svc.get_certificates("USER", None, Some("abc123"), None).await;

    assert!(records.is_empty());
    assert_eq!(errors.count(), 0);
}

#[tokio::test]
async fn malformed_organization_id_is_not_logged_as_error() {
    let (errors, _guard) = capture_errors();
    let svc = CertificateService::with_store(
        Arc::new(certview_store::MemoryStore::new()),
        Duration::from_secs(5),
    );

    let records = svc.get_certificates("ADMIN", None, None, Some("org-42")).await;
    let summary = svc
        .get_summary("ADMIN", None, "Registrar", None, Some("org-42"))
        .await;

    assert!(records.is_empty());
    assert!(summary.contains("Total Certificates Issued: 0"), "got: {summary}");
    assert_eq!(errors.count(), 0);
}

// -- Typed operations --------------------------------------------------------

#[tokio::test]
async fn typed_fetch_distinguishes_outage_from_no_matches() {
    let caller = CallerContext::new(Role::Student).with_email("a@x.edu");

    let err = unreachable_service()
        .fetch_certificates(&caller)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Connection(_))));
    assert_eq!(err.kind(), "connection");

    let empty = CertificateService::with_store(
        Arc::new(certview_store::MemoryStore::new()),
        Duration::from_secs(5),
    )
    .fetch_certificates(&caller)
    .await
    .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn typed_fetch_reports_timeout() {
    let err = hanging_service()
        .fetch_certificates(&CallerContext::new(Role::Moe))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Timeout(d) if d == Duration::from_millis(50)));
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn typed_ping_reports_outage() {
    let err = unreachable_service().ping().await.unwrap_err();
    assert_eq!(err.kind(), "connection");
}
