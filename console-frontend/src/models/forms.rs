//! Form payloads with field-level validation.
//!
//! Validation runs before any round-trip so obvious mistakes render
//! inline; the server remains the authority and its per-field errors are
//! mapped back onto forms the same way.

use crate::models::organization::Role;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 3, max = 150, message = "username must be 3-150 characters"))]
    pub username: String,
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password2: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Carried through from an invitation link, if the signup started there.
    #[serde(default)]
    pub invite_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationForm {
    #[validate(length(min = 1, max = 100, message = "organization name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InviteMemberForm {
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleForm {
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NamespaceForm {
    #[validate(length(min = 1, max = 100, message = "namespace name is required"))]
    pub name: String,
    pub organization: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenameNamespaceForm {
    #[validate(length(min = 1, max = 100, message = "namespace name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlForm {
    #[validate(url(message = "enter a valid URL"))]
    pub original_url: String,
    /// Blank means "let the server generate one".
    #[serde(default)]
    pub short_code: Option<String>,
    pub namespace: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlForm {
    #[serde(default)]
    #[validate(url(message = "enter a valid URL"))]
    pub original_url: Option<String>,
    #[serde(default)]
    pub short_code: Option<String>,
}

/// Normalizes an optional text input: whitespace-only becomes `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
