use serde::{Deserialize, Serialize};

/// Completed per-speaker capture received from the voice gateway.
///
/// The gateway applies the end-of-speech silence detection; by the time
/// a message arrives here the capture is final.
#[derive(Debug, Serialize, Deserialize)]
pub struct UtteranceMessage {
    pub session_key: String,
    pub speaker_id: String,
    pub username: String,
    pub pcm: String, // Base64-encoded LINEAR16 PCM
    pub channels: u16,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Recognition request sent to the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeRequest {
    pub audio: String, // Base64-encoded mono LINEAR16 PCM
    pub sample_rate: u32,
    pub language: String,
}

/// Recognition reply from the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub results: Vec<RecognizeResult>,
}

/// One recognized region, alternatives ranked best-first
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeResult {
    pub alternatives: Vec<String>,
}

/// Transcript line published for output-channel delivery
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptLineMessage {
    pub session_key: String,
    pub text: String,
    pub timestamp: String, // RFC3339 timestamp
}

/// Finalized transcript file published when a session closes
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptFileMessage {
    pub session_key: String,
    pub name: String,
    pub contents: String,
}
