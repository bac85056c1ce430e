pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::Settings;
use services::api_client::ApiClient;
use services::cache::QueryCache;
use services::invitations::InvitationsClient;
use services::namespaces::NamespacesClient;
use services::organizations::OrganizationsClient;
use services::urls::UrlsClient;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state: the API client, the process-wide query
/// cache and the resource clients built on both.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub api: Arc<ApiClient>,
    pub cache: Arc<QueryCache>,
    pub organizations: OrganizationsClient,
    pub namespaces: NamespacesClient,
    pub urls: UrlsClient,
    pub invitations: InvitationsClient,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let api = Arc::new(ApiClient::new(settings.api.base_url.clone()));
        let cache = Arc::new(QueryCache::new(Duration::from_secs(
            settings.api.cache_ttl_seconds,
        )));

        Self {
            organizations: OrganizationsClient::new(api.clone(), cache.clone()),
            namespaces: NamespacesClient::new(api.clone(), cache.clone()),
            urls: UrlsClient::new(api.clone(), cache.clone()),
            invitations: InvitationsClient::new(api.clone(), cache.clone()),
            settings,
            api,
            cache,
        }
    }
}
