use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub transcript: TranscriptConfig,
    pub nats: NatsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of captured PCM in Hz
    pub sample_rate: u32,
    /// Channel count of captured PCM (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Maximum duration of a single recognition segment in seconds
    pub max_segment_secs: u64,
    /// Captures shorter than this are discarded without recognition
    pub min_utterance_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptConfig {
    /// Gap between fragment start times that still counts as one utterance
    pub silence_threshold_ms: u64,
    /// Debounce delay before buffered fragments are flushed
    pub buffer_window_ms: u64,
    /// Maximum characters per delivered message chunk
    pub char_limit: usize,
    /// Similarity ratio at or above which consecutive chunks are suppressed
    pub similarity_threshold: f64,
    /// Directory for per-session transcript log files
    pub data_dir: String,
    /// Path to the speaker display-name mapping (JSON)
    pub speaker_names: String,
    /// Language code passed to the recognition service
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
