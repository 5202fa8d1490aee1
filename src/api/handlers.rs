//! API handlers for the chat transport
//!
//! The HTTP layer is a thin transport around
//! `ResolutionEngine::resolve(question)`: validation, history persistence,
//! and status reporting. No resolution logic lives here.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::engine::ResolutionEngine;
use crate::history::{ChatLog, ChatRecord};
use crate::knowledge::Provenance;
use crate::metrics::METRICS;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResolutionEngine>,
    pub history: Arc<ChatLog>,
    /// Model identifier reported by the status endpoint, when a generative
    /// backend is attached
    pub model_id: Option<String>,
}

/// API error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub provenance: Provenance,
    pub model_loaded: bool,
}

/// History response body
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatRecord>,
}

/// Status response body
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub knowledge_entries: usize,
}

/// Answer a question
///
/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ApiError>)> {
    let message = request.message.trim();

    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("VALIDATION_ERROR", "Message cannot be empty")),
        ));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, "chat request");

    let result = state.engine.resolve(message).await;

    state.history.append(ChatRecord::new(
        message,
        result.text.clone(),
        result.provenance,
    ));

    Ok(Json(ChatResponse {
        response: result.text,
        provenance: result.provenance,
        model_loaded: state.engine.has_provider(),
    }))
}

/// Return retained chat history, oldest first
///
/// GET /api/v1/history
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.history.read_all(),
    })
}

/// Report service status
///
/// GET /api/v1/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        model_loaded: state.engine.has_provider(),
        model_id: state.model_id.clone(),
        knowledge_entries: state.engine.knowledge_entries(),
    })
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// Export Prometheus metrics
///
/// GET /metrics
pub async fn metrics() -> String {
    METRICS.export_prometheus()
}
