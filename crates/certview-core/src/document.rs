//! # Raw Certificate Document Model
//!
//! Certificate documents were written by several generations of the issuing
//! application, so the same fact can appear under different keys:
//!
//! | Fact            | Current schema            | Legacy schema           |
//! |-----------------|---------------------------|-------------------------|
//! | Identifier      | `certificateId`           | `certificate_id`        |
//! | Issue date      | `issuedAt` (date)         | `issue_date` (string)   |
//! | Holder details  | nested `student.*`        | flat `student_name`, …  |
//! | PDF location    | `pdfUrl`                  | `storage.url`           |
//!
//! [`DocValue`] and [`Document`] are a store-neutral representation of one
//! stored document. [`RawCertificateDocument`] is the typed view that knows
//! the key spellings; nothing outside this module looks fields up by name.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::reference::ReferenceId;

// -- Values -------------------------------------------------------------------

/// One value inside a stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A structured date/time as stored natively by the database.
    DateTime(DateTime<Utc>),
    /// A native reference (object id).
    Reference(ReferenceId),
    Array(Vec<DocValue>),
    Object(Document),
}

impl DocValue {
    /// Whether the value counts as present for first-match-wins alias
    /// resolution.
    ///
    /// Null, `false`, zero, the empty string, and empty containers are
    /// treated as absent so that a blank current-schema field falls through
    /// to its legacy spelling.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::DateTime(_) | Self::Reference(_) => true,
            Self::Array(items) => !items.is_empty(),
            Self::Object(doc) => !doc.is_empty(),
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested document, if this is an object.
    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Self::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// String form of a scalar value. `None` for null and containers.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::Array(_) | Self::Object(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Reference(id) => Some(id.to_string()),
        }
    }

    /// Plain JSON rendering. Dates become RFC 3339 strings and references
    /// become their hex form.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Reference(id) => Value::String(id.to_string()),
            Self::Array(items) => Value::Array(items.iter().map(DocValue::to_json).collect()),
            Self::Object(doc) => doc.to_json(),
        }
    }
}

/// JSON conversion understands the relaxed extended-JSON wrappers
/// `{"$date": ...}` and `{"$oid": ...}` so fixtures and seed files can carry
/// native dates and references. A wrapper whose payload does not parse is
/// kept as an ordinary object.
impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(DocValue::from).collect()),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(native) = extended_json(&map) {
                        return native;
                    }
                }
                Self::Object(map.into_iter().map(|(k, v)| (k, DocValue::from(v))).collect())
            }
        }
    }
}

fn extended_json(map: &serde_json::Map<String, Value>) -> Option<DocValue> {
    if let Some(date) = map.get("$date") {
        return match date {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| DocValue::DateTime(dt.with_timezone(&Utc))),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(DocValue::DateTime),
            _ => None,
        };
    }
    if let Some(Value::String(oid)) = map.get("$oid") {
        return ReferenceId::parse(oid).ok().map(DocValue::Reference);
    }
    None
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for DocValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for DocValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for DocValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<ReferenceId> for DocValue {
    fn from(id: ReferenceId) -> Self {
        Self::Reference(id)
    }
}

impl From<Document> for DocValue {
    fn from(doc: Document) -> Self {
        Self::Object(doc)
    }
}

// -- Documents ----------------------------------------------------------------

/// A stored document: string keys to [`DocValue`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document(BTreeMap<String, DocValue>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DocValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DocValue>) -> Option<DocValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Top-level field lookup.
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.0.get(key)
    }

    /// Dotted-path lookup (`"student.email"`). Every intermediate segment
    /// must be an object.
    pub fn get_path(&self, path: &str) -> Option<&DocValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DocValue)> {
        self.0.iter()
    }

    /// Build a document from a JSON object. Returns `None` for any other
    /// JSON shape.
    pub fn from_json(value: Value) -> Option<Self> {
        match DocValue::from(value) {
            DocValue::Object(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, DocValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, DocValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// -- Typed certificate view ---------------------------------------------------

/// Typed accessors over a certificate document, one per legacy/current key.
#[derive(Debug, Clone, Copy)]
pub struct RawCertificateDocument<'a> {
    doc: &'a Document,
}

impl<'a> RawCertificateDocument<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// First key whose value is truthy.
    fn first_present(&self, keys: &[&str]) -> Option<&'a DocValue> {
        keys.iter()
            .filter_map(|k| self.doc.get_path(k))
            .find(|v| v.is_truthy())
    }

    fn field(&self, key: &str) -> Option<&'a DocValue> {
        self.doc.get(key)
    }

    /// `certificateId`, else `certificate_id`.
    pub fn certificate_id(&self) -> Option<&'a DocValue> {
        self.first_present(&["certificateId", "certificate_id"])
    }

    /// `issuedAt`, else `issue_date`.
    pub fn issued_at(&self) -> Option<&'a DocValue> {
        self.first_present(&["issuedAt", "issue_date"])
    }

    /// The nested holder section, when it is a non-empty object.
    pub fn student(&self) -> Option<StudentSection<'a>> {
        self.field("student")
            .and_then(DocValue::as_object)
            .filter(|doc| !doc.is_empty())
            .map(|doc| StudentSection { doc })
    }

    pub fn flat_student_name(&self) -> Option<&'a DocValue> {
        self.field("student_name")
    }

    pub fn flat_course_name(&self) -> Option<&'a DocValue> {
        self.field("course_name")
    }

    pub fn flat_grade(&self) -> Option<&'a DocValue> {
        self.field("grade")
    }

    pub fn flat_department(&self) -> Option<&'a DocValue> {
        self.field("department")
    }

    pub fn flat_roll_number(&self) -> Option<&'a DocValue> {
        self.field("roll_number")
    }

    pub fn flat_student_email(&self) -> Option<&'a DocValue> {
        self.field("student_email")
    }

    pub fn status(&self) -> Option<&'a DocValue> {
        self.field("status")
    }

    /// `pdfUrl`, else `storage.url`.
    pub fn pdf_url(&self) -> Option<&'a DocValue> {
        self.first_present(&["pdfUrl"])
            .or_else(|| self.doc.get_path("storage.url"))
    }

    pub fn verification_url(&self) -> Option<&'a DocValue> {
        self.field("verificationUrl")
    }

    pub fn blockchain_status(&self) -> Option<&'a DocValue> {
        self.field("blockchainStatus")
    }

    /// `metadata.institutionName`.
    pub fn institution_name(&self) -> Option<&'a DocValue> {
        self.doc.get_path("metadata.institutionName")
    }
}

/// The nested `student` object of a current-schema certificate.
#[derive(Debug, Clone, Copy)]
pub struct StudentSection<'a> {
    doc: &'a Document,
}

impl<'a> StudentSection<'a> {
    pub fn full_name(&self) -> Option<&'a DocValue> {
        self.doc.get("fullName")
    }

    pub fn father_name(&self) -> Option<&'a DocValue> {
        self.doc.get("fatherName")
    }

    pub fn course(&self) -> Option<&'a DocValue> {
        self.doc.get("course")
    }

    pub fn cgpa(&self) -> Option<&'a DocValue> {
        self.doc.get("cgpa")
    }

    pub fn department(&self) -> Option<&'a DocValue> {
        self.doc.get("department")
    }

    pub fn roll_number(&self) -> Option<&'a DocValue> {
        self.doc.get("rollNumber")
    }

    pub fn registration_number(&self) -> Option<&'a DocValue> {
        self.doc.get("registrationNumber")
    }

    pub fn passing_year(&self) -> Option<&'a DocValue> {
        self.doc.get("passingYear")
    }

    pub fn email(&self) -> Option<&'a DocValue> {
        self.doc.get("email")
    }
}
