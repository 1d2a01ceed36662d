// ABOUTME: Centralized error handling for the compare endpoint and the provider client
// ABOUTME: Keeps provider details in the logs and returns a generic message to clients

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Failures talking to the language-model provider.
///
/// The variants only exist for logging. Every one of them is reported to
/// the caller as the same internal server error.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rejected the credential: {0}")]
    InvalidCredential(String),
    #[error("provider does not know the model: {0}")]
    InvalidModel(String),
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("structured output did not match the result schema: {0}")]
    MalformedOutput(String),
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Provider(ProviderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Provider(err) => write!(f, "Provider error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.as_str())
            }
            AppError::Provider(err) => {
                tracing::error!(kind = err.kind(), "Provider error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl ProviderError {
    /// Short stable label for log filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::InvalidCredential(_) => "invalid_credential",
            ProviderError::InvalidModel(_) => "invalid_model",
            ProviderError::Upstream { .. } => "upstream",
            ProviderError::Transport(_) => "transport",
            ProviderError::MalformedOutput(_) => "malformed_output",
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
