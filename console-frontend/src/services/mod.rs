pub mod api_client;
pub mod cache;
pub mod invitations;
pub mod metrics;
pub mod namespaces;
pub mod organizations;
pub mod session;
pub mod token_store;
pub mod urls;
