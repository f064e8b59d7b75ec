//! # Canonical Certificate Record
//!
//! The schema-stable output shape, identical regardless of which document
//! generation it was normalized from. Every field is always serialized;
//! absence is an explicit `null`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder written to `issue_date` when the document carries no date.
pub const NOT_AVAILABLE: &str = "N/A";

/// Normalized certificate record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CanonicalCertificateRecord {
    pub certificate_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub course: Option<String>,
    /// `YYYY-MM-DD` for structured dates, the stored string otherwise,
    /// `N/A` when absent.
    pub issue_date: String,
    /// Grade or CGPA exactly as stored (string or number).
    #[schema(value_type = Option<Object>)]
    pub grade: Option<serde_json::Value>,
    pub status: Option<String>,
    pub pdf_url: Option<String>,
    /// Same value as `pdf_url`, kept for older consumers.
    pub cloudinary_url: Option<String>,
    pub verification_url: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
    pub registration_number: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub passing_year: Option<serde_json::Value>,
    pub student_email: Option<String>,
    pub blockchain_status: Option<String>,
    pub institution_name: Option<String>,
}

impl CanonicalCertificateRecord {
    /// Grade rendered for display: strings verbatim, numbers in decimal form.
    pub fn grade_text(&self) -> Option<String> {
        match self.grade.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
