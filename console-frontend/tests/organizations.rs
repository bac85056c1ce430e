mod common;

use axum::http::StatusCode;
use common::{auth_response, body_text, organization_json, user_json, TestApp};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn logged_in_app() -> TestApp {
    let mut app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_response("access-1", "refresh-1")))
        .mount(&app.api)
        .await;
    app.login().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&app.api)
        .await;
    app
}

#[tokio::test]
async fn upstream_field_errors_render_per_field() {
    let mut app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/organizations/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": ["organization with this name already exists."]
        })))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app.post_form("/organizations", &[("name", "Acme")]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().get("HX-Redirect").is_none());
    let body = body_text(response).await;
    assert!(body.contains("name"));
    assert!(body.contains("already exists"));
}

#[tokio::test]
async fn admins_can_invite_members() {
    let mut app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/organizations/1/invite/"))
        .and(body_json(json!({"email": "bob@example.com", "role": "EDITOR"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Invitation sent"
        })))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post_form(
            "/organizations/1/invite",
            &[("email", "bob@example.com"), ("role", "EDITOR")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Invitation sent") || body.contains("invited"));
}

#[tokio::test]
async fn role_changes_patch_the_membership_and_return_to_the_detail_page() {
    let mut app = logged_in_app().await;

    Mock::given(method("PATCH"))
        .and(path("/api/organizations/1/members/4/"))
        .and(body_json(json!({"role": "VIEWER"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "user": 9,
            "username": "bob",
            "email": "bob@example.com",
            "role": "VIEWER",
            "joined_at": "2026-02-01T08:00:00Z"
        })))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .patch_form("/organizations/1/members/4", &[("role", "VIEWER")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Redirect")
            .and_then(|v| v.to_str().ok()),
        Some("/organizations/1")
    );
}

#[tokio::test]
async fn metrics_label_requests_by_route_pattern() {
    let mut app = logged_in_app().await;
    console_frontend::services::metrics::init_metrics();

    Mock::given(method("GET"))
        .and(path("/api/organizations/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(organization_json(1, "Acme", "ADMIN")),
        )
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/namespaces/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.api)
        .await;

    let response = app.get("/organizations/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    // One series per route, not per organization id.
    let exported = console_frontend::services::metrics::get_metrics();
    assert!(exported.contains("path=\"/organizations/:id\""));
    assert!(!exported.contains("path=\"/organizations/1\""));
}

#[tokio::test]
async fn organization_detail_shows_members_and_namespaces() {
    let mut app = logged_in_app().await;

    let mut org = organization_json(1, "Acme", "ADMIN");
    org["members"] = json!([{
        "id": 4,
        "user": 9,
        "username": "bob",
        "email": "bob@example.com",
        "role": "EDITOR",
        "joined_at": "2026-02-01T08:00:00Z"
    }]);
    Mock::given(method("GET"))
        .and(path("/api/organizations/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(org))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/namespaces/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5,
            "name": "marketing",
            "organization": 1,
            "organization_name": "Acme",
            "created_at": "2026-01-10T12:00:00Z",
            "updated_at": "2026-01-10T12:00:00Z"
        }])))
        .mount(&app.api)
        .await;

    let response = app.get("/organizations/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Acme"));
    assert!(body.contains("bob"));
    assert!(body.contains("marketing"));
}
