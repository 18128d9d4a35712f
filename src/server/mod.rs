//! HTTP API.
//!
//! - `GET  /` service descriptor
//! - `GET  /health` status and recognizer state
//! - `POST /transcribe` transcript for `{url, language?, use_whisper?}`
//! - `GET  /transcribe/{video_id}?language=&use_whisper=` same, ID from the path

mod handlers;

use crate::error::{Result, ScribeError};
use crate::orchestrator::Orchestrator;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

/// Error body returned by the API.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Maps pipeline errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub ScribeError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, self.0.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Transcription failed: {}", self.0),
            )
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Build the API router.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/transcribe", post(handlers::transcribe))
        .route("/transcribe/{video_id}", get(handlers::transcribe_by_id))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
        .with_state(orchestrator)
}

/// Serve the API on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let app = router(orchestrator);
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
