use crate::middleware::guards::ONBOARDING_ROUTE;
use crate::models::organization::Organization;
use crate::models::user::{CurrentUser, User};
use crate::services::token_store::TokenStore;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: User,
    pub organizations: Vec<Organization>,
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    let organizations = match state.organizations.list(&tokens, user.id).await {
        Ok(organizations) => organizations,
        Err(e) => return e.into_response(),
    };

    // A member of nothing has not finished onboarding yet.
    if organizations.is_empty() {
        return Redirect::to(ONBOARDING_ROUTE).into_response();
    }

    DashboardTemplate {
        user,
        organizations,
    }
    .into_response()
}
