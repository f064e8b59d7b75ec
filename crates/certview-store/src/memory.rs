//! # In-Memory Store
//!
//! Holds certificate and profile documents in process and evaluates
//! [`Filter`]s directly. Used when no `MONGODB_URL` is configured and by
//! tests. Insertion order is the store order.
//!
//! All operations are synchronous under a `parking_lot::RwLock`; the lock is
//! never held across an `.await`.

use std::sync::Arc;

use async_trait::async_trait;
use certview_core::{DocValue, Document};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::store::{CertificateStore, StudentProfileStore};

/// Collection name reported in decode errors for seed data.
const SEED_SOURCE: &str = "seed";

/// Thread-safe, cloneable in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    certificates: Arc<RwLock<Vec<Document>>>,
    profiles: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with certificate documents.
    pub fn with_certificates(docs: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        store.certificates.write().extend(docs);
        store
    }

    pub fn insert_certificate(&self, doc: Document) {
        self.certificates.write().push(doc);
    }

    pub fn insert_profile(&self, doc: Document) {
        self.profiles.write().push(doc);
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates.read().len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }

    /// Load seed data from JSON.
    ///
    /// Accepts either an array of certificate documents or an object
    /// `{"certificates": [...], "students": [...]}`. Documents may use the
    /// `$date` / `$oid` extended-JSON wrappers.
    pub fn from_json_seed(seed: Value) -> Result<Self, StoreError> {
        let store = Self::new();
        match seed {
            Value::Array(items) => {
                store.certificates.write().extend(documents(items, "certificates")?);
            }
            Value::Object(mut sections) => {
                if let Some(certs) = sections.remove("certificates") {
                    store
                        .certificates
                        .write()
                        .extend(documents(array(certs, "certificates")?, "certificates")?);
                }
                if let Some(students) = sections.remove("students") {
                    store
                        .profiles
                        .write()
                        .extend(documents(array(students, "students")?, "students")?);
                }
            }
            _ => {
                return Err(StoreError::Decode {
                    collection: SEED_SOURCE.to_string(),
                    message: "seed must be a JSON array or object".to_string(),
                })
            }
        }
        Ok(store)
    }
}

fn array(value: Value, section: &str) -> Result<Vec<Value>, StoreError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(StoreError::Decode {
            collection: SEED_SOURCE.to_string(),
            message: format!("`{section}` must be an array"),
        }),
    }
}

fn documents(items: Vec<Value>, section: &str) -> Result<Vec<Document>, StoreError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Document::from_json(item).ok_or_else(|| StoreError::Decode {
                collection: SEED_SOURCE.to_string(),
                message: format!("`{section}[{i}]` is not an object"),
            })
        })
        .collect()
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn find_certificates(
        &self,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .certificates
            .read()
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl StudentProfileStore for MemoryStore {
    async fn find_student_profile(
        &self,
        student_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .profiles
            .read()
            .iter()
            .find(|doc| matches!(doc.get("student_id"), Some(DocValue::String(s)) if s == student_id))
            .cloned())
    }
}
