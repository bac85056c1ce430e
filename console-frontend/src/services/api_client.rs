//! The single point of outbound API traffic.
//!
//! Every request attaches the stored access token as a bearer credential
//! and carries W3C trace context. A 401 answer triggers at most one
//! refresh-and-replay: the refresh token is exchanged for a new access
//! token through a dedicated, unintercepted call, the new token is
//! persisted (refresh token unchanged) and the original request is
//! replayed once. A failed exchange clears the credential pair and
//! surfaces [`AppError::SessionExpired`]; the hosting shell, not this
//! layer, decides to navigate to the login screen.
//!
//! Concurrent requests hitting 401 at the same time each refresh
//! independently. The contract is "at most one replay per original
//! request", not single-flight refresh.

use crate::services::token_store::TokenStore;
use console_core::observability::TracedClientExt;
use console_core::AppError;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, AppError> {
        let mut request = self
            .http
            .traced_request(method.clone(), url)
            .bearer_auth_opt(bearer);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            tracing::error!(%method, url, "API request failed: {}", e);
            AppError::Network(e)
        })
    }

    /// Issue a request with bearer attachment and the single
    /// refresh-then-replay recovery described in the module docs.
    pub async fn execute(
        &self,
        tokens: &TokenStore,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, AppError> {
        let url = self.url(path);
        let access = tokens.access_token().await;

        let response = self
            .send_once(&method, &url, query, body, access.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // Without a refresh token the 401 propagates unmodified.
        let Some(refresh) = tokens.refresh_token().await else {
            return Ok(response);
        };

        let new_access = match self.exchange_refresh_token(&refresh).await {
            Ok(access) => access,
            Err(e) => {
                tracing::warn!("token refresh failed, ending session: {}", e);
                tokens.clear().await;
                return Err(AppError::SessionExpired);
            }
        };
        tokens.set_access_token(&new_access).await?;

        tracing::debug!(%method, path, "access token refreshed, replaying request");
        self.send_once(&method, &url, query, body, Some(&new_access))
            .await
    }

    /// Exchange the refresh token for a new access token. This call goes
    /// straight out, bypassing `execute`, so a 401 here cannot recurse.
    async fn exchange_refresh_token(&self, refresh: &str) -> Result<String, AppError> {
        let response = self
            .http
            .traced_post(&self.url("/auth/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .map_err(AppError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json().await.unwrap_or(serde_json::Value::Null);
            return Err(AppError::from_response(status, body));
        }

        #[derive(Deserialize)]
        struct RefreshResponse {
            access: String,
        }

        let refreshed: RefreshResponse = response.json().await.map_err(AppError::Network)?;
        Ok(refreshed.access)
    }

    async fn json_or_error<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(AppError::Network)
        } else {
            let body = response.json().await.unwrap_or(serde_json::Value::Null);
            Err(AppError::from_response(status, body))
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        tokens: &TokenStore,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .execute(tokens, Method::GET, path, query, None)
            .await?;
        Self::json_or_error(response).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        tokens: &TokenStore,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let body = serde_json::to_value(body).map_err(anyhow::Error::from)?;
        let response = self
            .execute(tokens, Method::POST, path, &[], Some(&body))
            .await?;
        Self::json_or_error(response).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        tokens: &TokenStore,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let body = serde_json::to_value(body).map_err(anyhow::Error::from)?;
        let response = self
            .execute(tokens, Method::PUT, path, &[], Some(&body))
            .await?;
        Self::json_or_error(response).await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        tokens: &TokenStore,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let body = serde_json::to_value(body).map_err(anyhow::Error::from)?;
        let response = self
            .execute(tokens, Method::PATCH, path, &[], Some(&body))
            .await?;
        Self::json_or_error(response).await
    }

    pub async fn delete(&self, tokens: &TokenStore, path: &str) -> Result<(), AppError> {
        let response = self
            .execute(tokens, Method::DELETE, path, &[], None)
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.json().await.unwrap_or(serde_json::Value::Null);
            Err(AppError::from_response(status, body))
        }
    }

    /// POST without bearer attachment or 401 interception, for the
    /// login/register endpoints that mint tokens in the first place.
    pub async fn post_json_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .traced_post(&self.url(path))
            .json(body)
            .send()
            .await
            .map_err(AppError::Network)?;
        Self::json_or_error(response).await
    }
}

/// The API answers list requests either with a bare array or with a
/// paginated envelope. Normalized here, at the boundary, into one
/// canonical sequence; nothing downstream sniffs response shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        #[allow(dead_code)]
        count: Option<i64>,
        results: Vec<T>,
    },
    Flat(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Flat(items) => items,
            ListResponse::Paginated { results, .. } => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_list_is_accepted() {
        let parsed: ListResponse<i64> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(parsed.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn paginated_envelope_is_accepted() {
        let parsed: ListResponse<i64> =
            serde_json::from_str(r#"{"count": 3, "next": null, "previous": null, "results": [1, 2, 3]}"#)
                .unwrap();
        assert_eq!(parsed.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_paginated_envelope_is_accepted() {
        let parsed: ListResponse<i64> = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(parsed.into_vec().is_empty());
    }
}
