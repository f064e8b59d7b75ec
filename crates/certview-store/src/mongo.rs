//! # MongoDB Backend
//!
//! Certificate and profile documents live in two collections of one
//! database. The driver's `Client` owns a connection pool; `MongoStore`
//! creates it once at startup and each call borrows a connection for the
//! duration of one query. Cursors are dropped (and their server-side
//! resources released) on every exit path, including errors.
//!
//! ## Translation
//!
//! | [`Filter`]                 | BSON                                  |
//! |----------------------------|---------------------------------------|
//! | `MatchAll`                 | `{}`                                  |
//! | `Eq { field, Text(s) }`    | `{ field: s }`                        |
//! | `Eq { field, Reference }`  | `{ field: ObjectId(..) }`             |
//! | `Or(clauses)`              | `{ "$or": [ .. ] }`                   |

use async_trait::async_trait;
use certview_core::{DocValue, Document, ReferenceId};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document as BsonDocument};
use mongodb::{Client, Collection};

use crate::config::{redact_url, StoreConfig};
use crate::error::StoreError;
use crate::filter::{Filter, FilterValue};
use crate::store::{CertificateStore, StudentProfileStore};

/// MongoDB-backed certificate and profile store.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    certificates: Collection<BsonDocument>,
    students: Collection<BsonDocument>,
}

impl MongoStore {
    /// Build the driver client from configuration.
    ///
    /// The driver connects lazily; use [`CertificateStore::ping`] to verify
    /// reachability.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.url).await.map_err(|e| {
            StoreError::Connection(format!("{}: {e}", redact_url(&config.url)))
        })?;
        let db = client.database(&config.database);
        let store = Self {
            certificates: db.collection(&config.certificates_collection),
            students: db.collection(&config.students_collection),
            database: config.database.clone(),
            client,
        };
        tracing::info!(
            database = %config.database,
            certificates = %config.certificates_collection,
            students = %config.students_collection,
            "MongoDB certificate store configured"
        );
        Ok(store)
    }

    fn query_error(collection: &Collection<BsonDocument>, err: mongodb::error::Error) -> StoreError {
        StoreError::Query {
            collection: collection.name().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl CertificateStore for MongoStore {
    async fn find_certificates(
        &self,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let query = filter_to_bson(filter)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut cursor = self
            .certificates
            .find(query)
            .limit(limit)
            .await
            .map_err(|e| Self::query_error(&self.certificates, e))?;

        let mut docs = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| Self::query_error(&self.certificates, e))?
        {
            let raw: BsonDocument = cursor.deserialize_current().map_err(|e| StoreError::Decode {
                collection: self.certificates.name().to_string(),
                message: e.to_string(),
            })?;
            docs.push(bson_to_document(raw));
        }

        tracing::debug!(
            collection = %self.certificates.name(),
            returned = docs.len(),
            limit,
            "certificate query complete"
        );
        Ok(docs)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

#[async_trait]
impl StudentProfileStore for MongoStore {
    async fn find_student_profile(
        &self,
        student_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.students
            .find_one(doc! { "student_id": student_id })
            .await
            .map(|found| found.map(bson_to_document))
            .map_err(|e| Self::query_error(&self.students, e))
    }
}

// -- Filter → BSON ------------------------------------------------------------

/// Translate a store-neutral filter to a MongoDB query document.
pub fn filter_to_bson(filter: &Filter) -> Result<BsonDocument, StoreError> {
    match filter {
        Filter::MatchAll => Ok(BsonDocument::new()),
        Filter::Eq { field, value } => {
            let mut query = BsonDocument::new();
            query.insert(field.clone(), value_to_bson(value)?);
            Ok(query)
        }
        Filter::Or(clauses) => {
            let clauses = clauses
                .iter()
                .map(|c| filter_to_bson(c).map(Bson::Document))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(doc! { "$or": Bson::Array(clauses) })
        }
    }
}

fn value_to_bson(value: &FilterValue) -> Result<Bson, StoreError> {
    match value {
        FilterValue::Text(s) => Ok(Bson::String(s.clone())),
        FilterValue::Reference(id) => ObjectId::parse_str(id.as_str())
            .map(Bson::ObjectId)
            .map_err(|e| StoreError::Query {
                collection: "filter".to_string(),
                message: format!("reference {id} rejected by driver: {e}"),
            }),
    }
}

// -- BSON → DocValue ----------------------------------------------------------

/// Convert a driver document into the store-neutral representation.
pub fn bson_to_document(raw: BsonDocument) -> Document {
    raw.into_iter()
        .map(|(k, v)| (k, bson_to_value(v)))
        .collect()
}

/// Convert one BSON value. Types without a store-neutral counterpart
/// (regexes, binaries, decimals, ...) keep their display form.
pub fn bson_to_value(value: Bson) -> DocValue {
    match value {
        Bson::Null | Bson::Undefined => DocValue::Null,
        Bson::Boolean(b) => DocValue::Bool(b),
        Bson::Int32(n) => DocValue::Int(i64::from(n)),
        Bson::Int64(n) => DocValue::Int(n),
        Bson::Double(f) => DocValue::Float(f),
        Bson::String(s) => DocValue::String(s),
        Bson::DateTime(dt) => match DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()) {
            Some(parsed) => DocValue::DateTime(parsed),
            None => DocValue::String(dt.to_string()),
        },
        Bson::ObjectId(oid) => {
            let hex = oid.to_hex();
            match ReferenceId::parse(&hex) {
                Ok(id) => DocValue::Reference(id),
                Err(_) => DocValue::String(hex),
            }
        }
        Bson::Array(items) => DocValue::Array(items.into_iter().map(bson_to_value).collect()),
        Bson::Document(doc) => DocValue::Object(bson_to_document(doc)),
        other => DocValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime as BsonDateTime;

    const OID: &str = "507f1f77bcf86cd799439011";

    fn oid() -> ReferenceId {
        ReferenceId::parse(OID).unwrap()
    }

    #[test]
    fn match_all_is_empty_document() {
        assert_eq!(filter_to_bson(&Filter::MatchAll).unwrap(), doc! {});
    }

    #[test]
    fn reference_equality_uses_object_id() {
        let query = filter_to_bson(&Filter::eq_reference("institutionId", oid())).unwrap();
        let expected = ObjectId::parse_str(OID).unwrap();
        assert_eq!(query, doc! { "institutionId": expected });
    }

    #[test]
    fn dotted_field_names_are_kept_verbatim() {
        let query = filter_to_bson(&Filter::eq_text("student.email", "a@x.edu")).unwrap();
        assert_eq!(query, doc! { "student.email": "a@x.edu" });
    }

    #[test]
    fn disjunction_translates_to_or_array() {
        let filter = Filter::Or(vec![
            Filter::eq_text("studentEmail", "a@x.edu"),
            Filter::eq_reference("studentId", oid()),
        ]);
        let expected_oid = ObjectId::parse_str(OID).unwrap();
        assert_eq!(
            filter_to_bson(&filter).unwrap(),
            doc! { "$or": [ { "studentEmail": "a@x.edu" }, { "studentId": expected_oid } ] }
        );
    }

    #[test]
    fn native_values_convert_to_doc_values() {
        let raw = doc! {
            "certificateId": "CERT-1",
            "issuedAt": BsonDateTime::from_millis(1_710_460_800_000),
            "institutionId": ObjectId::parse_str(OID).unwrap(),
            "student": { "cgpa": 8.5, "passingYear": 2024_i32 },
            "tags": ["a", "b"],
            "revoked": Bson::Null,
        };
        let converted = bson_to_document(raw);

        assert_eq!(converted.get("certificateId"), Some(&DocValue::from("CERT-1")));
        match converted.get("issuedAt") {
            Some(DocValue::DateTime(dt)) => assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-15"),
            other => panic!("expected date, got {other:?}"),
        }
        assert_eq!(converted.get("institutionId"), Some(&DocValue::Reference(oid())));
        assert_eq!(converted.get_path("student.cgpa"), Some(&DocValue::Float(8.5)));
        assert_eq!(converted.get_path("student.passingYear"), Some(&DocValue::Int(2024)));
        assert!(matches!(converted.get("tags"), Some(DocValue::Array(items)) if items.len() == 2));
        assert_eq!(converted.get("revoked"), Some(&DocValue::Null));
    }

    #[test]
    fn converted_current_schema_document_normalizes() {
        let raw = doc! {
            "certificateId": "CERT-9",
            "issuedAt": BsonDateTime::from_millis(1_710_460_800_000),
            "student": { "fullName": "Asha Verma" },
        };
        let record = certview_core::normalize(&bson_to_document(raw));
        assert_eq!(record.issue_date, "2024-03-15");
        assert_eq!(record.name.as_deref(), Some("Asha Verma"));
    }
}
