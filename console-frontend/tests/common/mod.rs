use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use console_frontend::config::{ApiSettings, ObservabilitySettings, ServerSettings, Settings};
use console_frontend::startup::build_router;
use console_frontend::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use wiremock::MockServer;

pub fn test_settings(base_url: String) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            session_inactivity_hours: 24,
        },
        api: ApiSettings {
            base_url,
            cache_ttl_seconds: 30,
            url_poll_seconds: 3,
        },
        observability: ObservabilitySettings {
            otlp_endpoint: None,
            log_level: "info".to_string(),
        },
    }
}

/// A router wired against a wiremock stand-in for the REST API, with
/// session-cookie carrying between requests so multi-step flows behave
/// like a browser session.
pub struct TestApp {
    pub api: MockServer,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let api = MockServer::start().await;
        let state = AppState::new(test_settings(api.uri()));
        TestApp {
            api,
            router: build_router(state),
            cookie: None,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should be infallible");
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie should be ascii");
            if let Some(pair) = raw.split(';').next() {
                self.cookie = Some(pair.to_string());
            }
        }
        response
    }

    fn builder(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    pub async fn get(&mut self, path: &str) -> Response {
        let request = self
            .builder("GET", path)
            .body(Body::empty())
            .expect("request should build");
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(form).expect("form should serialize");
        let request = self
            .builder("POST", path)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body))
            .expect("request should build");
        self.send(request).await
    }

    pub async fn patch_form(&mut self, path: &str, form: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(form).expect("form should serialize");
        let request = self
            .builder("PATCH", path)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body))
            .expect("request should build");
        self.send(request).await
    }

    /// Runs the login flow against already-mounted mocks and asserts it
    /// succeeded, leaving the session cookie stored for later requests.
    pub async fn login(&mut self) {
        let response = self
            .post_form("/login", &[("username", "alice"), ("password", "hunter22")])
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("HX-Redirect")
                .and_then(|v| v.to_str().ok()),
            Some("/dashboard")
        );
        assert!(self.cookie.is_some(), "login should establish a session");
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Archer"
    })
}

pub fn auth_response(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "user": user_json(),
        "tokens": { "access": access, "refresh": refresh }
    })
}

pub fn organization_json(id: i64, name: &str, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "created_at": "2026-01-10T12:00:00Z",
        "updated_at": "2026-01-10T12:00:00Z",
        "user_role": role
    })
}
