//! # Record Normalizer
//!
//! Maps one raw certificate document to a [`CanonicalCertificateRecord`].
//! Total and pure: a missing or oddly-typed field yields `None` (or `"N/A"`
//! for the issue date), never an error.
//!
//! ## Resolution order
//!
//! - `certificate_id`: `certificateId`, then `certificate_id`.
//! - `issue_date`: `issuedAt`, then `issue_date`. Structured dates are
//!   formatted `YYYY-MM-DD`; other present values keep their string form.
//! - Holder fields come from the nested `student` object when it is present
//!   and non-empty, otherwise from the flat legacy fields. `father_name`,
//!   `registration_number` and `passing_year` exist only in the nested form.
//! - `pdf_url` and `cloudinary_url`: `pdfUrl`, then `storage.url`.
//! - `institution_name`: `metadata.institutionName`.

use crate::document::{DocValue, Document, RawCertificateDocument};
use crate::record::{CanonicalCertificateRecord, NOT_AVAILABLE};

/// Normalize a stored certificate document.
pub fn normalize(doc: &Document) -> CanonicalCertificateRecord {
    let raw = RawCertificateDocument::new(doc);
    let student = raw.student();

    let (name, course, grade, department, roll_number, student_email) = match student {
        Some(s) => (
            s.full_name(),
            s.course(),
            s.cgpa(),
            s.department(),
            s.roll_number(),
            s.email(),
        ),
        None => (
            raw.flat_student_name(),
            raw.flat_course_name(),
            raw.flat_grade(),
            raw.flat_department(),
            raw.flat_roll_number(),
            raw.flat_student_email(),
        ),
    };

    let pdf_url = text(raw.pdf_url());

    CanonicalCertificateRecord {
        certificate_id: text(raw.certificate_id()),
        name: text(name),
        father_name: text(student.and_then(|s| s.father_name())),
        course: text(course),
        issue_date: issue_date(raw.issued_at()),
        grade: passthrough(grade),
        status: text(raw.status()),
        cloudinary_url: pdf_url.clone(),
        pdf_url,
        verification_url: text(raw.verification_url()),
        department: text(department),
        roll_number: text(roll_number),
        registration_number: text(student.and_then(|s| s.registration_number())),
        passing_year: passthrough(student.and_then(|s| s.passing_year())),
        student_email: text(student_email),
        blockchain_status: text(raw.blockchain_status()),
        institution_name: text(raw.institution_name()),
    }
}

/// Normalize every document, preserving order.
pub fn normalize_all<'a, I>(docs: I) -> Vec<CanonicalCertificateRecord>
where
    I: IntoIterator<Item = &'a Document>,
{
    docs.into_iter().map(normalize).collect()
}

fn text(value: Option<&DocValue>) -> Option<String> {
    value.and_then(DocValue::as_text)
}

fn passthrough(value: Option<&DocValue>) -> Option<serde_json::Value> {
    value
        .filter(|v| !matches!(v, DocValue::Null))
        .map(DocValue::to_json)
}

fn issue_date(value: Option<&DocValue>) -> String {
    match value {
        Some(DocValue::DateTime(dt)) => dt.format("%Y-%m-%d").to_string(),
        Some(other) if other.is_truthy() => other
            .as_text()
            .unwrap_or_else(|| other.to_json().to_string()),
        _ => NOT_AVAILABLE.to_string(),
    }
}
