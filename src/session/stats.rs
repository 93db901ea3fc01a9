use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time counters for one transcription session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_key: String,

    /// When the session was opened
    pub started_at: DateTime<Utc>,

    /// Seconds since the session was opened
    pub duration_secs: f64,

    /// Fragments awaiting the next flush
    pub pending_fragments: usize,

    /// Fragments buffered over the session's lifetime
    pub buffered_fragments: u64,

    /// Chunks delivered (logged and sent)
    pub delivered_lines: usize,

    /// Chunks suppressed as near-duplicates of their predecessor
    pub suppressed_duplicates: u64,
}
