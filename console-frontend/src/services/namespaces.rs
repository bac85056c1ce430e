//! Namespace queries and mutations.

use crate::models::forms::{NamespaceForm, RenameNamespaceForm};
use crate::models::namespace::Namespace;
use crate::services::api_client::{ApiClient, ListResponse};
use crate::services::cache::{CacheKey, QueryCache};
use crate::services::token_store::TokenStore;
use console_core::AppError;
use std::sync::Arc;

const RESOURCE: &str = "namespaces";

#[derive(Clone)]
pub struct NamespacesClient {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl NamespacesClient {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    /// List namespaces, optionally filtered by owning organization.
    pub async fn list(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        organization: Option<i64>,
    ) -> Result<Vec<Namespace>, AppError> {
        let key = CacheKey::list(user_id, RESOURCE, organization);
        if let Some(cached) = self.cache.get::<Vec<Namespace>>(&key) {
            return Ok(cached);
        }

        let mut query = Vec::new();
        if let Some(organization) = organization {
            query.push(("organization", organization.to_string()));
        }

        let response: ListResponse<Namespace> =
            self.api.get_json(tokens, "/namespaces/", &query).await?;
        let namespaces = response.into_vec();
        self.cache.put(key, &namespaces);
        Ok(namespaces)
    }

    pub async fn get(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        id: i64,
    ) -> Result<Namespace, AppError> {
        let key = CacheKey::detail(user_id, RESOURCE, id);
        if let Some(cached) = self.cache.get::<Namespace>(&key) {
            return Ok(cached);
        }

        let namespace: Namespace = self
            .api
            .get_json(tokens, &format!("/namespaces/{}/", id), &[])
            .await?;
        self.cache.put(key, &namespace);
        Ok(namespace)
    }

    pub async fn create(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        form: &NamespaceForm,
    ) -> Result<Namespace, AppError> {
        let namespace: Namespace = self
            .api
            .post_json(
                tokens,
                "/namespaces/",
                &serde_json::json!({ "name": form.name, "organization": form.organization }),
            )
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(namespace)
    }

    pub async fn rename(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        id: i64,
        form: &RenameNamespaceForm,
    ) -> Result<Namespace, AppError> {
        let namespace: Namespace = self
            .api
            .put_json(
                tokens,
                &format!("/namespaces/{}/", id),
                &serde_json::json!({ "name": form.name }),
            )
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(namespace)
    }

    pub async fn delete(&self, tokens: &TokenStore, user_id: i64, id: i64) -> Result<(), AppError> {
        self.api
            .delete(tokens, &format!("/namespaces/{}/", id))
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(())
    }
}
