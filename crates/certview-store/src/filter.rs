//! # Store-Neutral Query Filters
//!
//! The store collaborator only needs equality and logical OR. [`Filter`]
//! expresses exactly that; backends translate it to their native query
//! language. Dotted field names (`"student.email"`) address nested fields.

use certview_core::{DocValue, Document, ReferenceId};

/// Right-hand side of an equality test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Compare against a plain string.
    Text(String),
    /// Compare against the store's native reference type.
    Reference(ReferenceId),
}

/// A query filter over one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// No restriction.
    MatchAll,
    /// `field == value`.
    Eq { field: String, value: FilterValue },
    /// Any clause matches. An empty disjunction matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq_text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq {
            field: field.into(),
            value: FilterValue::Text(value.into()),
        }
    }

    pub fn eq_reference(field: impl Into<String>, id: ReferenceId) -> Self {
        Self::Eq {
            field: field.into(),
            value: FilterValue::Reference(id),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    /// Top-level disjunction clauses; empty for any other shape.
    pub fn clauses(&self) -> &[Filter] {
        match self {
            Self::Or(clauses) => clauses,
            _ => &[],
        }
    }

    /// Evaluate the filter against a document in-process.
    ///
    /// Equality follows document-database semantics: a field holding an
    /// array matches if any element equals the value.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Eq { field, value } => doc
                .get_path(field)
                .is_some_and(|found| value_matches(found, value)),
            Self::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

fn value_matches(found: &DocValue, expected: &FilterValue) -> bool {
    match (found, expected) {
        (DocValue::String(s), FilterValue::Text(t)) => s == t,
        (DocValue::Reference(r), FilterValue::Reference(e)) => r == e,
        (DocValue::Array(items), _) => items.iter().any(|item| value_matches(item, expected)),
        _ => false,
    }
}
