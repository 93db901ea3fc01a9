use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;

/// Tunables for one transcription session.
///
/// Everything the pipeline needs is injected here; the core modules
/// never read configuration themselves.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (one per voice room)
    pub session_key: String,

    /// Sample rate of captured PCM in Hz
    pub sample_rate: u32,

    /// Channel count of captured PCM
    pub channels: u16,

    /// Maximum duration of a single recognition segment
    pub max_segment_secs: u64,

    /// Captures shorter than this are skipped entirely
    pub min_utterance_ms: u64,

    /// Start-time gap that still joins two fragments into one utterance
    pub silence_threshold_ms: u64,

    /// Debounce delay between the first buffered fragment and the flush
    pub buffer_window: Duration,

    /// Maximum characters per delivered chunk
    pub char_limit: usize,

    /// Similarity ratio at or above which a chunk is suppressed
    pub similarity_threshold: f64,

    /// Language code passed to the recognition service
    pub language: String,

    /// Directory holding per-session transcript logs
    pub data_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_key: format!("session-{}", uuid::Uuid::new_v4()),
            sample_rate: 48000, // Opus voice capture rate
            channels: 2,
            max_segment_secs: 29, // recognizer accepts at most one minute
            min_utterance_ms: 300,
            silence_threshold_ms: 1000,
            buffer_window: Duration::from_secs(30),
            char_limit: 1900, // below the channel's 2000-char hard limit
            similarity_threshold: 0.8,
            language: "en-US".to_string(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl SessionConfig {
    /// Builds session tunables for `key` from the service configuration
    pub fn for_key(key: impl Into<String>, config: &Config) -> Self {
        Self {
            session_key: key.into(),
            sample_rate: config.audio.sample_rate,
            channels: config.audio.channels,
            max_segment_secs: config.audio.max_segment_secs,
            min_utterance_ms: config.audio.min_utterance_ms,
            silence_threshold_ms: config.transcript.silence_threshold_ms,
            buffer_window: Duration::from_millis(config.transcript.buffer_window_ms),
            char_limit: config.transcript.char_limit,
            similarity_threshold: config.transcript.similarity_threshold,
            language: config.transcript.language.clone(),
            data_dir: PathBuf::from(&config.transcript.data_dir),
        }
    }

    /// Clone of these tunables under a different session key
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        let mut config = self.clone();
        config.session_key = key.into();
        config
    }
}
