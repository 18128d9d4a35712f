//! HTTP handlers.

use super::ApiError;
use crate::error::ScribeError;
use crate::orchestrator::Orchestrator;
use crate::transcription::{lenient_flag, TranscriptRequest, TranscriptResponse};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

/// Query string accepted by `GET /transcribe/{video_id}`.
#[derive(Debug, Deserialize)]
pub struct TranscribeQuery {
    #[serde(default)]
    language: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    use_whisper: bool,
}

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "YouTube Transcription API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "transcribe": "POST /transcribe - Transcribe a YouTube video",
            "transcribe_by_id": "GET /transcribe/{video_id} - Transcribe a YouTube video by ID",
            "health": "GET /health - Health check"
        }
    }))
}

pub async fn health(State(orchestrator): State<Arc<Orchestrator>>) -> impl IntoResponse {
    let recognizer = orchestrator.recognizer();
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "whisper_model": recognizer.model_size().as_str(),
        "whisper_model_loaded": recognizer.is_loaded(),
    }))
}

pub async fn transcribe(
    State(orchestrator): State<Arc<Orchestrator>>,
    body: Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Json(request) = body.map_err(|e| invalid_request(e.body_text()))?;
    run(&orchestrator, request).await
}

pub async fn transcribe_by_id(
    State(orchestrator): State<Arc<Orchestrator>>,
    Path(video_id): Path<String>,
    query: Result<Query<TranscribeQuery>, QueryRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let Query(query) = query.map_err(|e| invalid_request(e.body_text()))?;
    let request = TranscriptRequest {
        url: video_id,
        language: query.language,
        use_whisper: query.use_whisper,
    };
    run(&orchestrator, request).await
}

async fn run(
    orchestrator: &Orchestrator,
    request: TranscriptRequest,
) -> Result<Json<TranscriptResponse>, ApiError> {
    match orchestrator.transcribe(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            if !e.is_client_error() {
                error!("Transcription failed for {}: {}", request.url, e);
            }
            Err(ApiError(e))
        }
    }
}

fn invalid_request(detail: String) -> ApiError {
    ApiError(ScribeError::InvalidRequest(detail))
}
