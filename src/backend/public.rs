//! Public request and response types for the reference backend

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Deserialize;

// Errors

/// A request the backend refuses, rendered as `400 Bad Request`.
pub struct ApiError(String);

impl ApiError {
    pub fn missing(param: &str) -> Self {
        Self(format!("Missing parameter: {}", param))
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("{}", self.0);
        (StatusCode::BAD_REQUEST, self.0).into_response()
    }
}

/// Treat blank values the same as missing ones.
pub fn required(value: Option<String>, param: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing(param))
}

/// `1`/`true`/`yes` (any case) are true, a missing value is `default`.
pub fn flag(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
    }
}

#[derive(Deserialize)]
pub struct PostChannelForm {
    pub message: Option<String>,
    pub collapse_key: Option<String>,
    pub delay_while_idle: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub reg_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AliasQuery {
    pub reg_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AliasForm {
    pub reg_id: Option<String>,
    pub alias: Option<String>,
}

#[derive(Deserialize)]
pub struct SendForm {
    pub to: Option<String>,
    pub msg: Option<String>,
    pub collapse_key: Option<String>,
    pub delay_while_idle: Option<String>,
}
