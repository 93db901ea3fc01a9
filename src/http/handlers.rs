use super::state::AppState;
use crate::nats::{listen_for_utterances, NatsChannel};
use crate::session::{SessionError, SessionStats};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Optional session key (if not provided, generate one)
    pub session_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_key: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_key: String,
    pub status: String,
    pub message: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Open a transcription session and start listening for captures
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let session_key = req
        .session_key
        .unwrap_or_else(|| format!("session-{}", uuid::Uuid::new_v4()));

    info!("Starting transcription session: {}", session_key);

    let channel = Arc::new(NatsChannel::new(state.nats.clone(), session_key.clone()));

    let session = match state.registry.open(&session_key, channel).await {
        Ok(session) => session,
        Err(SessionError::AlreadyActive(key)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Session {} is already active", key),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to open session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to open session: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Wire the audio source to the session before reporting success
    match listen_for_utterances(state.nats.clone(), Arc::clone(&session)).await {
        Ok(task) => {
            if let Err(e) = state.registry.attach_task(&session_key, task).await {
                error!("Failed to attach listener task: {}", e);
            }
        }
        Err(e) => {
            error!("Failed to start utterance listener: {}", e);
            if let Err(close_err) = state.registry.close(&session_key).await {
                error!("Failed to clean up session: {}", close_err);
            }
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start utterance listener: {}", e),
                }),
            )
                .into_response();
        }
    }

    info!("Session started successfully: {}", session_key);

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_key: session_key.clone(),
            status: "transcribing".to_string(),
            message: format!("Transcription started for session {}", session_key),
        }),
    )
        .into_response()
}

/// POST /sessions/stop/:session_key
/// Flush, finalize, and remove a session
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> impl IntoResponse {
    info!("Stopping transcription session: {}", session_key);

    let stats = match state.registry.get(&session_key).await {
        Ok(session) => session.stats().await,
        Err(SessionError::NotFound(key)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Session {} not found", key),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to look up session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to look up session: {}", e),
                }),
            )
                .into_response();
        }
    };

    match state.registry.close(&session_key).await {
        Ok(()) => {
            info!("Session stopped successfully: {}", session_key);
            (
                StatusCode::OK,
                Json(StopSessionResponse {
                    session_key: session_key.clone(),
                    status: "stopped".to_string(),
                    message: "Transcription stopped".to_string(),
                    stats,
                }),
            )
                .into_response()
        }
        Err(SessionError::NotFound(key)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", key),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to stop session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to stop session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_key/status
/// Get counters for a live session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&session_key).await {
        Ok(session) => (StatusCode::OK, Json(session.stats().await)).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_key),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:session_key/transcript
/// Get the transcript delivered so far
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&session_key).await {
        Ok(session) => {
            let transcript: Vec<String> = session.transcript().await;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_key),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
