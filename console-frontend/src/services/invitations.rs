//! Invitation validation and acceptance.

use crate::models::organization::{AcceptedInvitation, InvitationInfo};
use crate::services::api_client::ApiClient;
use crate::services::cache::QueryCache;
use crate::services::token_store::TokenStore;
use console_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct InvitationsClient {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl InvitationsClient {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    /// Check a raw invitation token. The endpoint answers 200 with the
    /// invite details, or 200 with an `error` field / a 4xx for invalid
    /// and expired tokens; both failure shapes normalize to an error.
    pub async fn validate(&self, tokens: &TokenStore, token: &str) -> Result<InvitationInfo, AppError> {
        #[derive(Deserialize)]
        struct ValidateResponse {
            #[serde(default)]
            error: Option<String>,
            #[serde(default)]
            email: Option<String>,
            #[serde(default)]
            organization_name: Option<String>,
            #[serde(default)]
            role: Option<crate::models::organization::Role>,
        }

        let response: ValidateResponse = self
            .api
            .get_json(tokens, &format!("/invitations/{}/validate/", token), &[])
            .await?;

        if let Some(error) = response.error {
            return Err(AppError::Conflict(error));
        }
        match (response.email, response.organization_name, response.role) {
            (Some(email), Some(organization_name), Some(role)) => Ok(InvitationInfo {
                email,
                organization_name,
                role,
            }),
            _ => Err(AppError::Upstream {
                status: 200,
                message: "invitation details missing from response".to_string(),
            }),
        }
    }

    /// Accept an invitation on behalf of the authenticated user. The
    /// organization list is stale afterwards, so it gets invalidated.
    pub async fn accept(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        token: &str,
    ) -> Result<AcceptedInvitation, AppError> {
        let accepted: AcceptedInvitation = self
            .api
            .post_json(
                tokens,
                &format!("/invitations/{}/accept/", token),
                &serde_json::json!({}),
            )
            .await?;
        self.cache.invalidate_resource(user_id, "organizations");
        Ok(accepted)
    }
}
