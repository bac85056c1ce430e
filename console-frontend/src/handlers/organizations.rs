use crate::handlers::{error_fragment, hx_redirect};
use crate::models::forms::{CreateOrganizationForm, InviteMemberForm, UpdateMemberRoleForm};
use crate::models::namespace::Namespace;
use crate::models::organization::{Organization, OrganizationMember};
use crate::models::user::{CurrentUser, User};
use crate::services::token_store::TokenStore;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Form,
};
use tower_sessions::Session;
use validator::Validate;

#[derive(Template)]
#[template(path = "create_organization.html")]
pub struct CreateOrganizationTemplate {
    pub user: User,
}

pub async fn create_organization_page(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    CreateOrganizationTemplate { user }
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CreateOrganizationForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state.organizations.create(&tokens, user.id, &form).await {
        Ok(organization) => {
            tracing::info!(organization_id = organization.id, name = %organization.name, "organization created");
            hx_redirect(&format!("/organizations/{}", organization.id))
        }
        Err(e) => error_fragment(&e),
    }
}

#[derive(Template)]
#[template(path = "organization_detail.html")]
pub struct OrganizationDetailTemplate {
    pub user: User,
    pub organization: Organization,
    pub members: Vec<OrganizationMember>,
    pub namespaces: Vec<Namespace>,
    pub is_admin: bool,
}

pub async fn organization_detail(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    let organization = match state.organizations.get(&tokens, user.id, id).await {
        Ok(organization) => organization,
        Err(e) => return e.into_response(),
    };

    let namespaces = match state
        .namespaces
        .list(&tokens, user.id, Some(organization.id))
        .await
    {
        Ok(namespaces) => namespaces,
        Err(e) => return e.into_response(),
    };

    let is_admin = organization.is_admin();
    let members = organization.members.clone().unwrap_or_default();

    OrganizationDetailTemplate {
        user,
        organization,
        members,
        namespaces,
        is_admin,
    }
    .into_response()
}

pub async fn invite_member_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<InviteMemberForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state
        .organizations
        .invite_member(&tokens, user.id, id, &form)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Html(format!(
                "<p class='text-emerald-500 text-sm'>Invitation sent to {}</p>",
                super::escape_html(&form.email)
            )),
        )
            .into_response(),
        Err(e) => error_fragment(&e),
    }
}

pub async fn update_member_role_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path((id, member_id)): Path<(i64, i64)>,
    Form(form): Form<UpdateMemberRoleForm>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);
    match state
        .organizations
        .update_member_role(&tokens, user.id, id, member_id, &form)
        .await
    {
        Ok(member) => {
            tracing::info!(member_id = member.id, role = member.role.as_str(), "member role updated");
            hx_redirect(&format!("/organizations/{}", id))
        }
        Err(e) => error_fragment(&e),
    }
}
