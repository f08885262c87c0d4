//! Error types for agent-server

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for agent-server
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the prompt service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request carried no usable prompt
    #[error("Prompt is required")]
    MissingPrompt,

    /// Request body could not be read, e.g. it exceeds the size limit
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),

    /// A task description template failed to compile or render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The LLM provider could not be set up
    #[error(transparent)]
    Provider(#[from] agent_llm::LLMError),

    /// Building or running the crew failed
    #[error(transparent)]
    Orchestration(#[from] agent_core::Error),
}

impl ServiceError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingPrompt => StatusCode::BAD_REQUEST,
            ServiceError::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ServiceError::MissingPrompt | ServiceError::Body(_) => {
                json!({ "error": self.to_string() })
            }
            _ => json!({ "success": false, "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
