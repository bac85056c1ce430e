//! Durable storage for the access/refresh credential pair.
//!
//! The pair lives in the browser-scoped session, so it survives page
//! reloads and dies with logout or an irrecoverable refresh failure. No
//! expiry is checked locally; a stale access token is only discovered when
//! the API answers 401.

use console_core::AppError;
use tower_sessions::Session;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const PENDING_INVITE_KEY: &str = "pending_invite";

#[derive(Clone)]
pub struct TokenStore {
    session: Session,
}

impl TokenStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.session.get(ACCESS_TOKEN_KEY).await.unwrap_or(None)
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.session.get(REFRESH_TOKEN_KEY).await.unwrap_or(None)
    }

    /// Presence of an access token, not its validity.
    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }

    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), AppError> {
        self.session
            .insert(ACCESS_TOKEN_KEY, access)
            .await
            .map_err(|e| AppError::Session(e.to_string()))?;
        self.session
            .insert(REFRESH_TOKEN_KEY, refresh)
            .await
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Rotate only the access token; the refresh token is unchanged by a
    /// refresh exchange.
    pub async fn set_access_token(&self, access: &str) -> Result<(), AppError> {
        self.session
            .insert(ACCESS_TOKEN_KEY, access)
            .await
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Destroys the credential pair but leaves the rest of the session
    /// (e.g. a pending invite) alone.
    pub async fn clear(&self) {
        let _ = self.session.remove::<String>(ACCESS_TOKEN_KEY).await;
        let _ = self.session.remove::<String>(REFRESH_TOKEN_KEY).await;
    }

    /// Drops the whole session, tokens included. Used on logout.
    pub async fn clear_session(&self) {
        self.session.clear().await;
    }

    /// Invitation token stashed while an unauthenticated visitor signs up.
    pub async fn set_pending_invite(&self, token: &str) -> Result<(), AppError> {
        self.session
            .insert(PENDING_INVITE_KEY, token)
            .await
            .map_err(|e| AppError::Session(e.to_string()))
    }

    pub async fn take_pending_invite(&self) -> Option<String> {
        self.session
            .remove::<String>(PENDING_INVITE_KEY)
            .await
            .unwrap_or(None)
    }
}
