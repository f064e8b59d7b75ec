//! # Query Planning
//!
//! Exactly one branch applies per caller:
//!
//! | Role                                  | Filter                              | Cap    |
//! |---------------------------------------|-------------------------------------|--------|
//! | `MOE`                                 | match all                           | 10 000 |
//! | `ADMIN` / `INSTITUTION` with an org id | `institutionId == <org reference>` | 1 000  |
//! | anything else                         | OR over email and identifier fields | 200    |
//!
//! The individual branch compares the email against every historical email
//! field, and the user id against both identifier fields as a plain string.
//! When the user id also parses as a reference id, the reference-typed
//! comparisons are appended. A user id that does not parse is ordinary data
//! and is not reported anywhere.
//!
//! An individual caller with neither email nor user id gets a match-all
//! filter (capped at 200). That is long-standing behaviour and is kept as is.

use certview_core::{CallerContext, ReferenceId, Role};
use certview_store::Filter;

use crate::error::QueryError;

/// Result cap for the ministry-wide view.
pub const MINISTRY_RESULT_CAP: usize = 10_000;
/// Result cap for one institution.
pub const INSTITUTION_RESULT_CAP: usize = 1_000;
/// Result cap for an individual caller.
pub const INDIVIDUAL_RESULT_CAP: usize = 200;

/// Field holding the issuing institution's reference id.
pub const INSTITUTION_FIELD: &str = "institutionId";

/// Email field names, current schema first.
pub const EMAIL_FIELDS: [&str; 3] = ["student.email", "studentEmail", "studentEmailId"];

/// Identifier field names.
pub const IDENTIFIER_FIELDS: [&str; 2] = ["student_id", "studentId"];

/// Which population a plan covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    /// Every certificate in the system.
    System,
    /// Certificates issued by one institution.
    Institution(ReferenceId),
    /// Certificates belonging to the caller.
    Individual,
}

impl QueryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Institution(_) => "institution",
            Self::Individual => "individual",
        }
    }
}

/// A store query ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub scope: QueryScope,
    pub filter: Filter,
    pub limit: usize,
}

/// Build the query for `caller`.
///
/// Fails only when an institutional caller's organization id is not a
/// reference id.
pub fn plan_query(caller: &CallerContext) -> Result<QueryPlan, QueryError> {
    match (caller.role, caller.organization_id.as_deref()) {
        (Role::Moe, _) => Ok(QueryPlan {
            scope: QueryScope::System,
            filter: Filter::MatchAll,
            limit: MINISTRY_RESULT_CAP,
        }),
        (Role::Admin | Role::Institution, Some(org)) => {
            let institution =
                ReferenceId::parse(org).map_err(|source| QueryError::InvalidOrganizationId {
                    value: org.to_string(),
                    source,
                })?;
            Ok(QueryPlan {
                filter: Filter::eq_reference(INSTITUTION_FIELD, institution.clone()),
                scope: QueryScope::Institution(institution),
                limit: INSTITUTION_RESULT_CAP,
            })
        }
        _ => Ok(individual_plan(
            caller.email.as_deref(),
            caller.user_id.as_deref(),
        )),
    }
}

fn individual_plan(email: Option<&str>, user_id: Option<&str>) -> QueryPlan {
    let mut clauses = Vec::new();

    if let Some(email) = email {
        clauses.extend(EMAIL_FIELDS.iter().map(|f| Filter::eq_text(*f, email)));
    }

    if let Some(user_id) = user_id {
        clauses.extend(IDENTIFIER_FIELDS.iter().map(|f| Filter::eq_text(*f, user_id)));
        if let Ok(reference) = ReferenceId::parse(user_id) {
            clauses.extend(
                IDENTIFIER_FIELDS
                    .iter()
                    .map(|f| Filter::eq_reference(*f, reference.clone())),
            );
        }
    }

    let filter = if clauses.is_empty() {
        Filter::MatchAll
    } else {
        Filter::Or(clauses)
    };

    QueryPlan {
        scope: QueryScope::Individual,
        filter,
        limit: INDIVIDUAL_RESULT_CAP,
    }
}
