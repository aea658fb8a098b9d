use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::RequestError;
use crate::services::reply;

/// Failures on the skill endpoints.
///
/// The chat platform only renders bodies sent with a success status, so every
/// variant becomes the apology text with `200 OK`.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Malformed skill request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
}

impl IntoResponse for SkillError {
    fn into_response(self) -> Response {
        tracing::warn!("Skill request rejected: {}", self);
        reply::request_error().into_response()
    }
}
