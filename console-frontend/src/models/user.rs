use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

/// The authenticated account as reported by `GET /auth/me/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// One initial per name part, at most two ("Jane Doe" -> "JD").
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

/// Current-user context for guarded handlers.
///
/// The auth guard resolves the session (refreshing tokens if needed) and
/// stores the [`User`] as a request extension; this extractor only reads
/// it back. Hitting the rejection means a route forgot its guard, in
/// which case we fail closed and bounce to login.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/login").into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        let user = User {
            id: 1,
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert_eq!(user.display_name(), "jdoe");
        assert_eq!(user.initials(), "J");
    }

    #[test]
    fn display_name_prefers_full_name() {
        let user = User {
            id: 1,
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        };
        assert_eq!(user.display_name(), "Jane Doe");
        assert_eq!(user.initials(), "JD");
    }
}
