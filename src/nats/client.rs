use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::messages::{
    RecognizeRequest, RecognizeResponse, TranscriptFileMessage, TranscriptLineMessage,
    UtteranceMessage,
};
use crate::audio::AudioSegment;
use crate::channel::OutputChannel;
use crate::recognize::Recognizer;
use crate::session::Session;

/// Recognition adapter backed by a NATS request/reply STT service.
///
/// The service receives base64 LINEAR16 mono PCM and replies with zero
/// or more results, each carrying ranked alternatives. The adapter takes
/// the first alternative of every result and joins them with newlines.
pub struct NatsRecognizer {
    client: Client,
    sample_rate: u32,
}

impl NatsRecognizer {
    pub fn new(client: Client, sample_rate: u32) -> Self {
        Self {
            client,
            sample_rate,
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for NatsRecognizer {
    async fn recognize(&self, segment: &AudioSegment, language: &str) -> Result<Option<String>> {
        let request = RecognizeRequest {
            audio: base64::engine::general_purpose::STANDARD.encode(segment.pcm_bytes()),
            sample_rate: self.sample_rate,
            language: language.to_string(),
        };

        let payload = serde_json::to_vec(&request)?;

        let reply = self
            .client
            .request("stt.recognize".to_string(), payload.into())
            .await
            .context("Recognition request failed")?;

        let response: RecognizeResponse =
            serde_json::from_slice(&reply.payload).context("Malformed recognition reply")?;

        let text = response
            .results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");

        debug!("Recognition result: {:?}", text);

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

/// Output channel publishing transcript lines to a per-session subject
pub struct NatsChannel {
    client: Client,
    session_key: String,
}

impl NatsChannel {
    pub fn new(client: Client, session_key: String) -> Self {
        Self {
            client,
            session_key,
        }
    }
}

#[async_trait::async_trait]
impl OutputChannel for NatsChannel {
    async fn send(&self, content: &str) -> Result<()> {
        let subject = format!("transcript.text.{}", self.session_key);

        let message = TranscriptLineMessage {
            session_key: self.session_key.clone(),
            text: content.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.client
            .publish(subject, serde_json::to_vec(&message)?.into())
            .await
            .context("Failed to publish transcript line")?;

        Ok(())
    }

    async fn send_file(&self, name: &str, contents: &str) -> Result<()> {
        let subject = format!("transcript.file.{}", self.session_key);

        let message = TranscriptFileMessage {
            session_key: self.session_key.clone(),
            name: name.to_string(),
            contents: contents.to_string(),
        };

        self.client
            .publish(subject, serde_json::to_vec(&message)?.into())
            .await
            .context("Failed to publish transcript file")?;

        Ok(())
    }
}

/// Subscribes to a session's utterance subject and feeds each completed
/// capture through segmentation, recognition, and buffering.
///
/// Captures are processed one at a time so a single utterance's
/// fragments are buffered in segment order. The returned handle is owned
/// by the registry and aborted when the session closes.
pub async fn listen_for_utterances(
    client: Client,
    session: Arc<Session>,
) -> Result<JoinHandle<()>> {
    let subject = format!("audio.utterance.{}", session.key());

    let mut subscriber = client
        .subscribe(subject.clone())
        .await
        .context("Failed to subscribe to utterance subject")?;

    info!("Subscribed to {}", subject);

    let handle = tokio::spawn(async move {
        while let Some(msg) = subscriber.next().await {
            let utterance: UtteranceMessage = match serde_json::from_slice(&msg.payload) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Failed to parse utterance message: {}", e);
                    continue;
                }
            };

            let pcm = match base64::engine::general_purpose::STANDARD.decode(&utterance.pcm) {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!("Failed to decode PCM payload from {}: {}", utterance.username, e);
                    continue;
                }
            };

            session
                .ingest_utterance(
                    &utterance.speaker_id,
                    &utterance.username,
                    &pcm,
                    utterance.channels,
                    utterance.start_ms,
                    utterance.end_ms,
                )
                .await;
        }

        info!("Utterance listener stopped for session {}", session.key());
    });

    Ok(handle)
}
