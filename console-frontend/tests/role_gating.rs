mod common;

use axum::http::StatusCode;
use common::{auth_response, body_text, organization_json, user_json, TestApp};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn namespace_json(id: i64, organization: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "marketing",
        "organization": organization,
        "organization_name": "Acme",
        "created_at": "2026-01-10T12:00:00Z",
        "updated_at": "2026-01-10T12:00:00Z"
    })
}

fn short_url_json(id: i64, namespace: i64) -> serde_json::Value {
    json!({
        "id": id,
        "original_url": "https://example.com/a/very/long/path",
        "short_code": "spring-sale",
        "namespace": namespace,
        "namespace_name": "marketing",
        "created_by": 1,
        "created_by_username": "alice",
        "created_at": "2026-01-12T09:30:00Z",
        "updated_at": "2026-01-12T09:30:00Z",
        "click_count": 42
    })
}

async fn app_with_role(role: &str) -> TestApp {
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
    Mock::given(method("GET"))
        .and(path("/api/namespaces/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(namespace_json(5, 1)))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/organizations/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(organization_json(1, "Acme", role)),
        )
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/urls/"))
        .and(query_param("namespace", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([short_url_json(9, 5)])),
        )
        .mount(&app.api)
        .await;
    app
}

#[tokio::test]
async fn viewers_get_a_read_only_url_page() {
    let mut app = app_with_role("VIEWER").await;

    let response = app.get("/namespaces/5/urls").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("marketing"));
    assert!(!body.contains("Shorten a URL"));

    let response = app.get("/urls/table?namespace=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("spring-sale"));
    assert!(body.contains("42"));
    assert!(!body.contains("hx-delete"));
}

#[tokio::test]
async fn editors_get_mutation_controls() {
    let mut app = app_with_role("EDITOR").await;

    let response = app.get("/namespaces/5/urls").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Shorten a URL"));

    let response = app.get("/urls/table?namespace=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("hx-delete=\"/urls/9\""));
}

#[tokio::test]
async fn namespace_management_controls_are_admin_only() {
    let mut app = app_with_role("VIEWER").await;

    Mock::given(method("GET"))
        .and(path("/api/namespaces/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([namespace_json(5, 1)])))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/organizations/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([organization_json(1, "Acme", "VIEWER")])),
        )
        .mount(&app.api)
        .await;

    let response = app.get("/namespaces").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("marketing"));
    assert!(!body.contains("hx-put=\"/namespaces/5\""));
    assert!(!body.contains("hx-delete=\"/namespaces/5\""));
    assert!(!body.contains("Create namespace"));
}

#[tokio::test]
async fn admins_manage_namespaces() {
    let mut app = app_with_role("ADMIN").await;

    Mock::given(method("GET"))
        .and(path("/api/namespaces/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([namespace_json(5, 1)])))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/organizations/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([organization_json(1, "Acme", "ADMIN")])),
        )
        .mount(&app.api)
        .await;

    let response = app.get("/namespaces").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("hx-put=\"/namespaces/5\""));
    assert!(body.contains("hx-delete=\"/namespaces/5\""));
    assert!(body.contains("Create namespace"));
}

#[tokio::test]
async fn paginated_list_envelopes_decode_like_bare_arrays() {
    let mut app = app_with_role("EDITOR").await;

    // A second namespace answered in DRF's paginated shape renders the
    // same table markup as the bare-array one.
    Mock::given(method("GET"))
        .and(path("/api/namespaces/6/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 6,
            "name": "sales",
            "organization": 1,
            "organization_name": "Acme",
            "created_at": "2026-01-10T12:00:00Z",
            "updated_at": "2026-01-10T12:00:00Z"
        })))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/urls/"))
        .and(query_param("namespace", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [short_url_json(11, 6)]
        })))
        .mount(&app.api)
        .await;

    let response = app.get("/urls/table?namespace=6").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("spring-sale"));
}
