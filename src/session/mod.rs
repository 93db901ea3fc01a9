//! Session lifecycle management
//!
//! This module provides the per-room transcription session and the
//! process-wide registry that owns it:
//! - Fragment buffering and debounced flushing
//! - Chronological message assembly and chunked delivery
//! - Durable transcript logging and export on close
//! - Session statistics and state management

mod config;
mod registry;
mod session;
mod stats;

pub use config::SessionConfig;
pub use registry::{SessionError, SessionRegistry};
pub use session::Session;
pub use stats::SessionStats;
