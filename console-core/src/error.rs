use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    /// 401 from the API that could not (or must not) be recovered by a
    /// token refresh. The caller decides whether this means "log in".
    #[error("unauthorized")]
    Unauthorized,

    /// The refresh-token exchange itself failed. Tokens have already been
    /// cleared by the time this surfaces; the hosting shell is expected to
    /// navigate to the login screen.
    #[error("session expired")]
    SessionExpired,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-success answer from the API.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("session storage error: {0}")]
    Session(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classify a non-success API response from its status and decoded
    /// JSON body. Bodies are decoded tolerantly: the API answers with
    /// `{"field": ["msg", ...]}` maps for validation failures and with
    /// one of `message` / `error` / `detail` otherwise.
    pub fn from_response(status: StatusCode, body: serde_json::Value) -> Self {
        let message = extract_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                match extract_field_errors(&body) {
                    Some(fields) if !fields.is_empty() => AppError::Validation(fields),
                    _ => AppError::Upstream {
                        status: status.as_u16(),
                        message,
                    },
                }
            }
            StatusCode::UNAUTHORIZED => AppError::Unauthorized,
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => AppError::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Human-readable summary for form-level display.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(fields) => fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages
                        .iter()
                        .map(move |message| format!("{}: {}", field, message))
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// True when the only sensible reaction is a trip to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::SessionExpired)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, kinds) in errors.field_errors() {
            let messages = kinds
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        AppError::Validation(fields)
    }
}

fn extract_message(body: &serde_json::Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

fn extract_field_errors(body: &serde_json::Value) -> Option<FieldErrors> {
    let object = body.as_object()?;
    let mut fields = FieldErrors::new();
    for (field, value) in object {
        if let Some(items) = value.as_array() {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect();
            if !messages.is_empty() {
                fields.insert(field.clone(), messages);
            }
        }
    }
    Some(fields)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.requires_login() {
            return Redirect::to("/login").into_response();
        }

        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::Session(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, self.message()).into_response()
    }
}
