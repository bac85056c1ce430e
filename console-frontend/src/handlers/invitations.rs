use crate::services::session::SessionController;
use crate::services::token_store::TokenStore;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "invite_accept.html")]
pub struct InviteAcceptTemplate {
    pub error: Option<String>,
}

/// Landing page for `/invite/{token}` links from invitation emails.
///
/// The token is validated first in either case. An authenticated visitor
/// accepts immediately and lands on the new organization; an anonymous
/// one gets the token stashed in the session and is sent to signup with
/// it carried in the query string as well.
pub async fn invite_landing(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);
    let controller = SessionController::new(state.api.clone(), tokens.clone());

    if let Err(e) = state.invitations.validate(&tokens, &token).await {
        return InviteAcceptTemplate {
            error: Some(e.message()),
        }
        .into_response();
    }

    match controller.current_user().await {
        Some(user) => match state.invitations.accept(&tokens, user.id, &token).await {
            Ok(accepted) => {
                tracing::info!(
                    organization = %accepted.organization_name,
                    role = accepted.role.as_str(),
                    "invitation accepted"
                );
                Redirect::to(&format!("/organizations/{}", accepted.organization_id))
                    .into_response()
            }
            Err(e) if e.requires_login() => {
                Redirect::to(crate::middleware::guards::LOGIN_ROUTE).into_response()
            }
            Err(e) => InviteAcceptTemplate {
                error: Some(e.message()),
            }
            .into_response(),
        },
        None => {
            if let Err(e) = tokens.set_pending_invite(&token).await {
                tracing::warn!("failed to stash invite token in session: {}", e);
            }
            Redirect::to(&format!("/signup?invite_token={}", token)).into_response()
        }
    }
}
