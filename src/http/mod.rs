//! HTTP API server for external control
//!
//! This module provides a REST API for controlling transcription
//! sessions:
//! - POST /sessions/start - Open a session and start transcribing
//! - POST /sessions/stop/:key - Flush, finalize, and remove a session
//! - GET /sessions/:key/status - Query session counters
//! - GET /sessions/:key/transcript - Get the transcript so far
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
