//! Student profile records, kept in a separate collection from certificates
//! and looked up by the profile's `student_id` field.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::{DocValue, Document};

/// Academic profile of one student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentProfile {
    pub enrollment_number: Option<String>,
    pub courses_enrolled: Vec<String>,
    pub certificates_earned: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub total_credits: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub current_semester: Option<serde_json::Value>,
    pub department: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub additional_info: Option<serde_json::Value>,
}

impl StudentProfile {
    /// Build a profile from its stored document. Total: missing fields are
    /// `None` or empty lists.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            enrollment_number: doc.get("enrollment_number").and_then(DocValue::as_text),
            courses_enrolled: string_list(doc.get("courses_enrolled")),
            certificates_earned: string_list(doc.get("certificates_earned")),
            total_credits: json(doc.get("total_credits")),
            current_semester: json(doc.get("current_semester")),
            department: doc.get("department").and_then(DocValue::as_text),
            additional_info: json(doc.get("additional_info")),
        }
    }
}

fn string_list(value: Option<&DocValue>) -> Vec<String> {
    match value {
        Some(DocValue::Array(items)) => items.iter().filter_map(DocValue::as_text).collect(),
        _ => Vec::new(),
    }
}

fn json(value: Option<&DocValue>) -> Option<serde_json::Value> {
    value
        .filter(|v| !matches!(v, DocValue::Null))
        .map(DocValue::to_json)
}
