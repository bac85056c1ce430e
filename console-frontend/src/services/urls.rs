//! Short-URL queries and mutations.

use crate::models::forms::{blank_to_none, CreateUrlForm, UpdateUrlForm};
use crate::models::short_url::ShortUrl;
use crate::services::api_client::{ApiClient, ListResponse};
use crate::services::cache::{CacheKey, QueryCache};
use crate::services::token_store::TokenStore;
use console_core::AppError;
use std::sync::Arc;

const RESOURCE: &str = "urls";

/// Whether a read may be served from the process-wide cache. The polling
/// table always refetches so click counts stay current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Cached,
    Refetch,
}

#[derive(Clone)]
pub struct UrlsClient {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl UrlsClient {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    /// List short URLs, optionally filtered by namespace.
    pub async fn list(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        namespace: Option<i64>,
        freshness: Freshness,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let key = CacheKey::list(user_id, RESOURCE, namespace);
        if freshness == Freshness::Cached {
            if let Some(cached) = self.cache.get::<Vec<ShortUrl>>(&key) {
                return Ok(cached);
            }
        }

        let mut query = Vec::new();
        if let Some(namespace) = namespace {
            query.push(("namespace", namespace.to_string()));
        }

        let response: ListResponse<ShortUrl> = self.api.get_json(tokens, "/urls/", &query).await?;
        let urls = response.into_vec();
        self.cache.put(key, &urls);
        Ok(urls)
    }

    pub async fn get(&self, tokens: &TokenStore, user_id: i64, id: i64) -> Result<ShortUrl, AppError> {
        let key = CacheKey::detail(user_id, RESOURCE, id);
        if let Some(cached) = self.cache.get::<ShortUrl>(&key) {
            return Ok(cached);
        }

        let url: ShortUrl = self
            .api
            .get_json(tokens, &format!("/urls/{}/", id), &[])
            .await?;
        self.cache.put(key, &url);
        Ok(url)
    }

    pub async fn create(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        form: &CreateUrlForm,
    ) -> Result<ShortUrl, AppError> {
        let mut body = serde_json::json!({
            "original_url": form.original_url,
            "namespace": form.namespace,
        });
        if let Some(short_code) = blank_to_none(form.short_code.clone()) {
            body["short_code"] = serde_json::Value::String(short_code);
        }

        let url: ShortUrl = self.api.post_json(tokens, "/urls/", &body).await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(url)
    }

    pub async fn update(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        id: i64,
        form: &UpdateUrlForm,
    ) -> Result<ShortUrl, AppError> {
        let mut body = serde_json::Map::new();
        if let Some(original_url) = blank_to_none(form.original_url.clone()) {
            body.insert("original_url".into(), original_url.into());
        }
        if let Some(short_code) = blank_to_none(form.short_code.clone()) {
            body.insert("short_code".into(), short_code.into());
        }

        let url: ShortUrl = self
            .api
            .put_json(tokens, &format!("/urls/{}/", id), &serde_json::Value::Object(body))
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(url)
    }

    pub async fn delete(&self, tokens: &TokenStore, user_id: i64, id: i64) -> Result<(), AppError> {
        self.api.delete(tokens, &format!("/urls/{}/", id)).await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(())
    }
}
