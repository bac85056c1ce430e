use crate::handlers::{error_fragment, hx_redirect};
use crate::middleware::guards::{DASHBOARD_ROUTE, LOGIN_ROUTE, ONBOARDING_ROUTE};
use crate::models::forms::{LoginForm, SignupForm};
use crate::services::session::SessionController;
use crate::services::token_store::TokenStore;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub invite_token: Option<String>,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {}
}

#[derive(Deserialize)]
pub struct SignupParams {
    pub invite_token: Option<String>,
}

pub async fn signup_page(Query(params): Query<SignupParams>) -> impl IntoResponse {
    SignupTemplate {
        invite_token: params.invite_token,
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    let controller = SessionController::new(state.api.clone(), tokens.clone());

    let auth = match controller.login(&form.username, &form.password).await {
        Ok(auth) => auth,
        // A 401 here is bad credentials, not an expired session.
        Err(console_core::AppError::Unauthorized) => {
            return (
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                axum::response::Html(
                    "<p class='text-red-500 text-sm'>Invalid username or password</p>".to_string(),
                ),
            )
                .into_response()
        }
        Err(e) => return error_fragment(&e),
    };

    // A pending invitation from before the login completes now;
    // membership is a best effort, the login itself already succeeded.
    if let Some(invite_token) = tokens.take_pending_invite().await {
        if let Err(e) = state
            .invitations
            .accept(&tokens, auth.user.id, &invite_token)
            .await
        {
            tracing::warn!("failed to accept stored invitation after login: {}", e);
        }
    }

    hx_redirect(DASHBOARD_ROUTE)
}

pub async fn signup_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    let controller = SessionController::new(state.api.clone(), tokens.clone());

    let auth = match controller.register(&form).await {
        Ok(auth) => auth,
        Err(e) => return error_fragment(&e),
    };

    // An invite token carried through the form (or stashed earlier by the
    // invite landing page) is redeemed right after the account exists.
    let invite_token = match &form.invite_token {
        Some(token) if !token.is_empty() => Some(token.clone()),
        _ => tokens.take_pending_invite().await,
    };
    let mut joined_via_invite = auth.invitation_accepted;
    if let Some(invite_token) = invite_token {
        match state
            .invitations
            .accept(&tokens, auth.user.id, &invite_token)
            .await
        {
            Ok(accepted) => {
                tracing::info!(
                    organization = %accepted.organization_name,
                    "invitation accepted during signup"
                );
                joined_via_invite = true;
            }
            Err(e) => tracing::warn!("failed to accept invitation during signup: {}", e),
        }
    }

    // A brand-new user with no memberships goes through onboarding to
    // create a first organization; one who joined via invite already has
    // one and lands on the dashboard.
    if auth.is_new_user && !joined_via_invite {
        hx_redirect(ONBOARDING_ROUTE)
    } else {
        hx_redirect(DASHBOARD_ROUTE)
    }
}

pub async fn logout_handler(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let controller = SessionController::new(state.api.clone(), TokenStore::new(session));
    controller.logout().await;
    Redirect::to(LOGIN_ROUTE)
}
