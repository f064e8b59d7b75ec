//! # Caller Context
//!
//! Per-request identity of whoever is asking for certificates. The role and
//! organization are supplied by an upstream gateway that has already
//! authenticated the caller; nothing in certview second-guesses them.

use serde::{Deserialize, Serialize};

/// Caller role. Determines query scope and summary layout.
///
/// Parsing is total: any unrecognised role string is an individual caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// An individual certificate holder (wire name `USER` or `STUDENT`).
    #[default]
    #[serde(rename = "USER", alias = "STUDENT")]
    Student,
    /// Institution administrator.
    Admin,
    /// Institution service account.
    Institution,
    /// Ministry of Education; sees every institution.
    Moe,
}

impl Role {
    /// Interpret a role string. Case-insensitive; unknown values map to
    /// [`Role::Student`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Self::Admin,
            "INSTITUTION" => Self::Institution,
            "MOE" => Self::Moe,
            _ => Self::Student,
        }
    }

    /// Wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "USER",
            Self::Admin => "ADMIN",
            Self::Institution => "INSTITUTION",
            Self::Moe => "MOE",
        }
    }

    /// Whether this role acts on behalf of an institution.
    pub fn is_institutional(&self) -> bool {
        matches!(self, Self::Admin | Self::Institution)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the caller for one request. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub role: Role,
    pub email: Option<String>,
    /// Opaque user identifier; may or may not be a reference id.
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    /// Name shown in rendered summaries.
    pub display_name: Option<String>,
}

impl CallerContext {
    /// Create a context with only a role set.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = non_blank(user_id.into());
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = non_blank(organization_id.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = non_blank(name.into());
        self
    }

    /// Build a context from optional raw claim strings. Blank values are
    /// treated as absent.
    pub fn from_claims(
        role: Option<&str>,
        email: Option<&str>,
        user_id: Option<&str>,
        organization_id: Option<&str>,
    ) -> Self {
        Self {
            role: role.map(Role::parse).unwrap_or_default(),
            email: email.and_then(|s| non_blank(s.to_string())),
            user_id: user_id.and_then(|s| non_blank(s.to_string())),
            organization_id: organization_id.and_then(|s| non_blank(s.to_string())),
            display_name: None,
        }
    }

    /// Name used in summaries, falling back to the email, then `"User"`.
    pub fn subject_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
