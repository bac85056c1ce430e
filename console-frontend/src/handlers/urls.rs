use crate::handlers::{error_fragment, hx_redirect};
use crate::models::forms::{CreateUrlForm, UpdateUrlForm};
use crate::models::short_url::ShortUrl;
use crate::models::user::CurrentUser;
use crate::services::token_store::TokenStore;
use crate::services::urls::Freshness;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

#[derive(Template)]
#[template(path = "urls.html")]
pub struct UrlsPageTemplate {
    pub user: crate::models::user::User,
    pub namespace: crate::models::namespace::Namespace,
    pub can_edit: bool,
    pub poll_seconds: u64,
}

/// Short URLs of one namespace. The page itself is a shell; the table is
/// an HTMX fragment that keeps itself fresh.
pub async fn urls_page(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(namespace_id): Path<i64>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    let namespace = match state.namespaces.get(&tokens, user.id, namespace_id).await {
        Ok(namespace) => namespace,
        Err(e) => return e.into_response(),
    };
    let can_edit = match resolve_can_edit(&state, &tokens, user.id, namespace_id).await {
        Ok(can_edit) => can_edit,
        Err(e) => return e.into_response(),
    };

    UrlsPageTemplate {
        user,
        namespace,
        can_edit,
        poll_seconds: state.settings.api.url_poll_seconds,
    }
    .into_response()
}

/// The short-URL table fragment. It reloads itself on a fixed interval
/// while the tab is visible (`hx-trigger` condition), which keeps click
/// counts current without any background work when the page is hidden.
#[derive(Template)]
#[template(path = "partials/urls_table.html")]
pub struct UrlsTableTemplate {
    pub urls: Vec<ShortUrl>,
    pub namespace: i64,
    pub can_edit: bool,
    pub poll_seconds: u64,
}

#[derive(Deserialize)]
pub struct UrlsTableParams {
    pub namespace: i64,
}

pub async fn urls_table_fragment(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Query(params): Query<UrlsTableParams>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    // Polling reads always go to the server; cached click counts would
    // defeat the point of the refresh.
    let urls = match state
        .urls
        .list(&tokens, user.id, Some(params.namespace), Freshness::Refetch)
        .await
    {
        Ok(urls) => urls,
        Err(e) => return e.into_response(),
    };

    let can_edit = match resolve_can_edit(&state, &tokens, user.id, params.namespace).await {
        Ok(can_edit) => can_edit,
        Err(e) => return e.into_response(),
    };

    UrlsTableTemplate {
        urls,
        namespace: params.namespace,
        can_edit,
        poll_seconds: state.settings.api.url_poll_seconds,
    }
    .into_response()
}

/// The caller's role in the namespace's owning organization decides
/// whether mutation controls are rendered at all.
async fn resolve_can_edit(
    state: &AppState,
    tokens: &TokenStore,
    user_id: i64,
    namespace_id: i64,
) -> Result<bool, console_core::AppError> {
    let namespace = state.namespaces.get(tokens, user_id, namespace_id).await?;
    let role = state
        .organizations
        .role_in(tokens, user_id, namespace.organization)
        .await?;
    Ok(role.map(|r| r.can_edit_urls()).unwrap_or(false))
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CreateUrlForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state.urls.create(&tokens, user.id, &form).await {
        Ok(url) => {
            tracing::info!(url_id = url.id, short_code = %url.short_code, "short URL created");
            hx_redirect(&format!("/namespaces/{}/urls", form.namespace))
        }
        Err(e) => error_fragment(&e),
    }
}

pub async fn update_url_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<UpdateUrlForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state.urls.update(&tokens, user.id, id, &form).await {
        Ok(url) => hx_redirect(&format!("/namespaces/{}/urls", url.namespace)),
        Err(e) => error_fragment(&e),
    }
}

pub async fn delete_url_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    // Look the URL up before deleting so we know which page to return to.
    let namespace = match state.urls.get(&tokens, user.id, id).await {
        Ok(url) => url.namespace,
        Err(e) => return error_fragment(&e),
    };
    match state.urls.delete(&tokens, user.id, id).await {
        Ok(()) => hx_redirect(&format!("/namespaces/{namespace}/urls")),
        Err(e) => error_fragment(&e),
    }
}
