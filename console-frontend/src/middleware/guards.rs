//! Route guards: render or redirect based on session state.
//!
//! Three variants share one capability. In a server-rendered app there is
//! no "loading" frame to paint: the response is simply withheld until the
//! session (and, for onboarding, the organization list) has resolved, so
//! protected markup can never flash before a redirect.

use crate::services::session::SessionController;
use crate::services::token_store::TokenStore;
use crate::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use tower_sessions::Session;

pub const LOGIN_ROUTE: &str = "/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const ONBOARDING_ROUTE: &str = "/create-organization";

/// Per-route override for where `require_guest` sends authenticated
/// visitors. Attached as a route-layer extension.
#[derive(Debug, Clone, Copy)]
pub struct GuestRedirect(pub &'static str);

/// Authenticated-only routes. Resolves the current user (running the
/// token refresh underneath when the access token has gone stale) and
/// stores it as a request extension; unauthenticated visitors land on the
/// login screen.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let controller = SessionController::new(state.api.clone(), TokenStore::new(session));

    match controller.current_user().await {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to(LOGIN_ROUTE).into_response(),
    }
}

/// Public-only routes (login, signup). An authenticated visitor has no
/// business here and is sent to the dashboard, or to the route's
/// [`GuestRedirect`] override.
pub async fn require_guest(
    State(state): State<AppState>,
    session: Session,
    redirect: Option<Extension<GuestRedirect>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let controller = SessionController::new(state.api.clone(), TokenStore::new(session));

    match controller.current_user().await {
        Some(_) => {
            let target = redirect.map(|Extension(r)| r.0).unwrap_or(DASHBOARD_ROUTE);
            Redirect::to(target).into_response()
        }
        None => next.run(request).await,
    }
}

/// Onboarding-only routes. Requires both the session and the
/// organization list to have resolved before any decision: unauthenticated
/// visitors go to login, members of at least one organization go to the
/// dashboard, and only a user with zero organizations may proceed (this is
/// the one path that creates a first organization).
pub async fn require_onboarding(
    State(state): State<AppState>,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let tokens = TokenStore::new(session);
    let controller = SessionController::new(state.api.clone(), tokens.clone());

    let Some(user) = controller.current_user().await else {
        return Redirect::to(LOGIN_ROUTE).into_response();
    };

    match state.organizations.list(&tokens, user.id).await {
        Ok(organizations) if !organizations.is_empty() => {
            Redirect::to(DASHBOARD_ROUTE).into_response()
        }
        Ok(_) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            // An unanswerable organization list must not lock the user
            // out of onboarding; treat it like an empty one.
            tracing::warn!("organization lookup failed during onboarding check: {}", e);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
    }
}
