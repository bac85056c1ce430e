use crate::handlers::{error_fragment, hx_redirect};
use crate::models::forms::{NamespaceForm, RenameNamespaceForm};
use crate::models::namespace::Namespace;
use crate::models::organization::Organization;
use crate::models::user::{CurrentUser, User};
use crate::services::token_store::TokenStore;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Form,
};
use tower_sessions::Session;
use validator::Validate;

/// A namespace plus whether the caller administers its organization;
/// rename/delete controls only render for admins.
pub struct NamespaceRow {
    pub namespace: Namespace,
    pub is_admin: bool,
}

#[derive(Template)]
#[template(path = "namespaces.html")]
pub struct NamespacesTemplate {
    pub user: User,
    pub rows: Vec<NamespaceRow>,
    /// Organizations where the user may manage namespaces; feeds the
    /// create form's organization picker.
    pub admin_organizations: Vec<Organization>,
}

pub async fn namespaces_page(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);

    let namespaces = match state.namespaces.list(&tokens, user.id, None).await {
        Ok(namespaces) => namespaces,
        Err(e) => return e.into_response(),
    };
    let organizations = match state.organizations.list(&tokens, user.id).await {
        Ok(organizations) => organizations,
        Err(e) => return e.into_response(),
    };

    let admin_organizations: Vec<Organization> = organizations
        .into_iter()
        .filter(|org| org.is_admin())
        .collect();
    let rows = namespaces
        .into_iter()
        .map(|namespace| NamespaceRow {
            is_admin: admin_organizations
                .iter()
                .any(|org| org.id == namespace.organization),
            namespace,
        })
        .collect();

    NamespacesTemplate {
        user,
        rows,
        admin_organizations,
    }
    .into_response()
}

pub async fn create_namespace_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NamespaceForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state.namespaces.create(&tokens, user.id, &form).await {
        Ok(namespace) => {
            tracing::info!(namespace_id = namespace.id, name = %namespace.name, "namespace created");
            hx_redirect("/namespaces")
        }
        Err(e) => error_fragment(&e),
    }
}

pub async fn rename_namespace_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<RenameNamespaceForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return error_fragment(&errors.into());
    }

    let tokens = TokenStore::new(session);
    match state.namespaces.rename(&tokens, user.id, id, &form).await {
        Ok(_) => hx_redirect("/namespaces"),
        Err(e) => error_fragment(&e),
    }
}

pub async fn delete_namespace_handler(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let tokens = TokenStore::new(session);
    match state.namespaces.delete(&tokens, user.id, id).await {
        Ok(()) => hx_redirect("/namespaces"),
        Err(e) => error_fragment(&e),
    }
}
