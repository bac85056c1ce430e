pub mod app;
pub mod auth;
pub mod dashboard;
pub mod invitations;
pub mod metrics;
pub mod namespaces;
pub mod organizations;
pub mod urls;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use console_core::AppError;

/// Client-side navigation for HTMX form posts: 200 with an `HX-Redirect`
/// header instead of a 3xx, so the browser swaps the whole page.
pub fn hx_redirect(target: &str) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(target) {
        Ok(value) => {
            headers.insert("HX-Redirect", value);
            (StatusCode::OK, headers, "").into_response()
        }
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect target").into_response(),
    }
}

/// Render an error as an inline fragment for the form's error target.
/// Validation errors list per-field messages; a dead session turns into a
/// trip to the login screen instead of an inline message.
pub fn error_fragment(err: &AppError) -> Response {
    if err.requires_login() {
        return hx_redirect(crate::middleware::guards::LOGIN_ROUTE);
    }

    let body = match err.field_errors() {
        Some(fields) => {
            let items: String = fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |message| {
                        format!(
                            "<li><strong>{}</strong>: {}</li>",
                            escape_html(field),
                            escape_html(message)
                        )
                    })
                })
                .collect();
            format!("<ul class='text-red-500 text-sm'>{}</ul>", items)
        }
        None => format!(
            "<p class='text-red-500 text-sm'>{}</p>",
            escape_html(&err.message())
        ),
    };

    (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response()
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_core::error::FieldErrors;

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn validation_errors_render_per_field() {
        let mut fields = FieldErrors::new();
        fields.insert("email".into(), vec!["enter a valid email address".into()]);
        let response = error_fragment(&AppError::Validation(fields));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn expired_session_becomes_login_redirect() {
        let response = error_fragment(&AppError::SessionExpired);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("HX-Redirect").unwrap(),
            "/login"
        );
    }
}
