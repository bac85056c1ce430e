use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, put},
    Router,
};
use console_core::middleware::tracing::request_id_middleware;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler, signup_handler, signup_page},
    dashboard::dashboard_handler,
    invitations::invite_landing,
    namespaces::{
        create_namespace_handler, delete_namespace_handler, namespaces_page,
        rename_namespace_handler,
    },
    organizations::{
        create_organization_handler, create_organization_page, invite_member_handler,
        organization_detail, update_member_role_handler,
    },
    urls::{
        create_url_handler, delete_url_handler, update_url_handler, urls_page,
        urls_table_fragment,
    },
};
use crate::middleware::guards::{require_auth, require_guest, require_onboarding};
use crate::services::metrics::metrics_middleware;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Session setup; the session holds the access/refresh token pair.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.settings.server.session_inactivity_hours,
        )));

    let guest = || from_fn_with_state(state.clone(), require_guest);
    let authed = || from_fn_with_state(state.clone(), require_auth);
    let onboarding = || from_fn_with_state(state.clone(), require_onboarding);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler).layer(guest()))
        .route(
            "/signup",
            get(signup_page).post(signup_handler).layer(guest()),
        )
        .route("/logout", get(logout_handler))
        .route("/invite/:token", get(invite_landing))
        .route(
            "/create-organization",
            get(create_organization_page).layer(onboarding()),
        )
        .route(
            "/organizations",
            post(create_organization_handler).layer(authed()),
        )
        .route("/dashboard", get(dashboard_handler).layer(authed()))
        .route(
            "/organizations/:id",
            get(organization_detail).layer(authed()),
        )
        .route(
            "/organizations/:id/invite",
            post(invite_member_handler).layer(authed()),
        )
        .route(
            "/organizations/:id/members/:member_id",
            patch(update_member_role_handler).layer(authed()),
        )
        .route(
            "/namespaces",
            get(namespaces_page)
                .post(create_namespace_handler)
                .layer(authed()),
        )
        .route(
            "/namespaces/:id",
            put(rename_namespace_handler)
                .delete(delete_namespace_handler)
                .layer(authed()),
        )
        .route("/namespaces/:id/urls", get(urls_page).layer(authed()))
        .route("/urls/table", get(urls_table_fragment).layer(authed()))
        .route("/urls", post(create_url_handler).layer(authed()))
        .route(
            "/urls/:id",
            put(update_url_handler)
                .delete(delete_url_handler)
                .layer(authed()),
        )
        .layer(session_layer)
        // route_layer so the matched route pattern is available as the
        // metrics path label.
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
