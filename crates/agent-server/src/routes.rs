//! Axum routes

use crate::error::{Result, ServiceError};
use crate::service::PromptProcessor;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared handler state
pub struct AppState {
    processor: Arc<dyn PromptProcessor>,
    service_name: String,
}

impl AppState {
    /// Create state around a prompt processor
    pub fn new(processor: Arc<dyn PromptProcessor>, service_name: impl Into<String>) -> Self {
        Self {
            processor,
            service_name: service_name.into(),
        }
    }
}

/// Successful `/process` response
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub result: String,
}

/// `/health` response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

/// Build the application router
///
/// Routes are served at the root and again under `/api/crewai`.
pub fn router(state: AppState) -> Router {
    let api = Router::<Arc<AppState>>::new()
        .route("/process", post(process))
        .route("/health", get(health));

    Router::new()
        .merge(api.clone())
        .nest("/api/crewai", api)
        .with_state(Arc::new(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// POST /process
async fn process(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ProcessResponse>> {
    let body = body?;
    let prompt = extract_prompt(&body).ok_or(ServiceError::MissingPrompt)?;
    info!("Received prompt: {prompt}");

    match state.processor.process(&prompt).await {
        Ok(result) => Ok(Json(ProcessResponse {
            success: true,
            result,
        })),
        Err(e) => {
            error!("Error processing task: {e}");
            Err(e)
        }
    }
}

// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.service_name.clone(),
    })
}

/// Pull a non-empty `prompt` string out of a JSON object body
fn extract_prompt(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("prompt")? {
        Value::String(prompt) if !prompt.is_empty() => Some(prompt.clone()),
        _ => None,
    }
}
