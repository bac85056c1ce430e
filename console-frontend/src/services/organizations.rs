//! Organization queries and mutations.

use crate::models::forms::{CreateOrganizationForm, InviteMemberForm, UpdateMemberRoleForm};
use crate::models::organization::{Organization, OrganizationMember, Role};
use crate::services::api_client::{ApiClient, ListResponse};
use crate::services::cache::{CacheKey, QueryCache};
use crate::services::token_store::TokenStore;
use console_core::AppError;
use std::sync::Arc;

const RESOURCE: &str = "organizations";

#[derive(Clone)]
pub struct OrganizationsClient {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl OrganizationsClient {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub async fn list(&self, tokens: &TokenStore, user_id: i64) -> Result<Vec<Organization>, AppError> {
        let key = CacheKey::list(user_id, RESOURCE, None);
        if let Some(cached) = self.cache.get::<Vec<Organization>>(&key) {
            return Ok(cached);
        }

        let response: ListResponse<Organization> =
            self.api.get_json(tokens, "/organizations/", &[]).await?;
        let organizations = response.into_vec();
        self.cache.put(key, &organizations);
        Ok(organizations)
    }

    pub async fn get(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        id: i64,
    ) -> Result<Organization, AppError> {
        let key = CacheKey::detail(user_id, RESOURCE, id);
        if let Some(cached) = self.cache.get::<Organization>(&key) {
            return Ok(cached);
        }

        let organization: Organization = self
            .api
            .get_json(tokens, &format!("/organizations/{}/", id), &[])
            .await?;
        self.cache.put(key, &organization);
        Ok(organization)
    }

    /// Create an organization; the server makes the caller its ADMIN.
    pub async fn create(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        form: &CreateOrganizationForm,
    ) -> Result<Organization, AppError> {
        let organization: Organization = self
            .api
            .post_json(tokens, "/organizations/", &serde_json::json!({ "name": form.name }))
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(organization)
    }

    pub async fn invite_member(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        organization_id: i64,
        form: &InviteMemberForm,
    ) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .api
            .post_json(
                tokens,
                &format!("/organizations/{}/invite/", organization_id),
                &serde_json::json!({ "email": form.email, "role": form.role }),
            )
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(())
    }

    pub async fn update_member_role(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        organization_id: i64,
        member_id: i64,
        form: &UpdateMemberRoleForm,
    ) -> Result<OrganizationMember, AppError> {
        let member: OrganizationMember = self
            .api
            .patch_json(
                tokens,
                &format!("/organizations/{}/members/{}/", organization_id, member_id),
                &serde_json::json!({ "role": form.role }),
            )
            .await?;
        self.cache.invalidate_resource(user_id, RESOURCE);
        Ok(member)
    }

    /// Role of the given user inside one organization, if known.
    pub async fn role_in(
        &self,
        tokens: &TokenStore,
        user_id: i64,
        organization_id: i64,
    ) -> Result<Option<Role>, AppError> {
        Ok(self.get(tokens, user_id, organization_id).await?.user_role)
    }
}
