//! Session controller: owns "who is logged in" for one request.
//!
//! Explicitly constructed from the request's session and the shared API
//! client, never a hidden global. Guards build one per request; handlers
//! receive the already-resolved [`crate::models::user::User`].

use crate::models::forms::SignupForm;
use crate::models::user::User;
use crate::services::api_client::ApiClient;
use crate::services::token_store::TokenStore;
use console_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Answer of the login/register endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
    /// Only register sets this; absent means false.
    #[serde(default)]
    pub is_new_user: bool,
    /// Set when the server auto-accepted a pending invitation.
    #[serde(default)]
    pub invitation_accepted: bool,
}

pub struct SessionController {
    api: Arc<ApiClient>,
    tokens: TokenStore,
}

impl SessionController {
    pub fn new(api: Arc<ApiClient>, tokens: TokenStore) -> Self {
        Self { api, tokens }
    }

    /// Resolve the current user. With no access token present this is
    /// `None` without any network traffic. Otherwise `GET /auth/me/` runs
    /// through the refreshing client; any failure clears the credential
    /// pair and resolves to unauthenticated rather than erroring out.
    pub async fn current_user(&self) -> Option<User> {
        if !self.tokens.is_authenticated().await {
            return None;
        }

        match self.api.get_json::<User>(&self.tokens, "/auth/me/", &[]).await {
            Ok(user) => Some(user),
            Err(AppError::SessionExpired) => {
                // Tokens are already gone; the refresh exchange failed.
                None
            }
            Err(e) => {
                tracing::warn!("failed to fetch current user, treating as logged out: {}", e);
                self.tokens.clear().await;
                None
            }
        }
    }

    /// Authenticate and store the returned credential pair. Errors
    /// (invalid credentials, validation) propagate to the form; there is
    /// no retry.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let response: AuthResponse = self
            .api
            .post_json_public(
                "/auth/login/",
                &serde_json::json!({
                    "username": username,
                    "password": password,
                }),
            )
            .await?;

        self.tokens
            .set_tokens(&response.tokens.access, &response.tokens.refresh)
            .await?;

        tracing::info!(user_id = response.user.id, username = %response.user.username, "user logged in");
        Ok(response)
    }

    /// Create an account and store the returned credential pair. The
    /// `is_new_user` flag on the response routes the caller to onboarding.
    pub async fn register(&self, form: &SignupForm) -> Result<AuthResponse, AppError> {
        let response: AuthResponse = self
            .api
            .post_json_public(
                "/auth/register/",
                &serde_json::json!({
                    "username": form.username,
                    "email": form.email,
                    "password": form.password,
                    "password2": form.password2,
                    "first_name": form.first_name.as_deref().unwrap_or_default(),
                    "last_name": form.last_name.as_deref().unwrap_or_default(),
                }),
            )
            .await?;

        self.tokens
            .set_tokens(&response.tokens.access, &response.tokens.refresh)
            .await?;

        tracing::info!(user_id = response.user.id, username = %response.user.username, "user registered");
        Ok(response)
    }

    /// Purely local: drop the session. Server-side token invalidation is
    /// not this client's concern.
    pub async fn logout(&self) {
        self.tokens.clear_session().await;
        tracing::info!("user logged out");
    }

    /// Best-effort re-fetch of the current user. Unlike
    /// [`Self::current_user`], a failure here neither clears the stored
    /// tokens nor surfaces an error.
    pub async fn refresh_user(&self) -> Option<User> {
        if !self.tokens.is_authenticated().await {
            return None;
        }
        match self.api.get_json::<User>(&self.tokens, "/auth/me/", &[]).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("best-effort user refresh failed: {}", e);
                None
            }
        }
    }
}
