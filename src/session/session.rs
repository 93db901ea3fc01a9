use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::Segmenter;
use crate::channel::OutputChannel;
use crate::recognize::Recognizer;
use crate::transcript::{
    assemble_utterances, chunk_message, Fragment, FragmentBuffers, SpeakerNames, TranscriptSink,
};

/// One active transcription session for a voice room.
///
/// Owns the per-speaker fragment buffers, the flush debounce timer, and
/// the transcript sink. Captured utterances enter through
/// [`ingest_utterance`](Session::ingest_utterance); the first buffered
/// fragment arms a single flush timer, and [`flush`](Session::flush)
/// drains every speaker's buffer into ordered, chunked, delivered
/// messages.
///
/// The timer is armed once when buffering starts and is not reset by
/// later arrivals; after a flush it is re-armed only if fragments
/// remain. Flushes are serialized per session, so log and channel
/// append order always match the computed message order.
pub struct Session {
    config: SessionConfig,
    names: Arc<SpeakerNames>,
    recognizer: Arc<dyn Recognizer>,
    channel: Arc<dyn OutputChannel>,
    segmenter: Segmenter,
    sink: TranscriptSink,
    started_at: DateTime<Utc>,
    state: Mutex<BufferState>,
    flush_gate: Mutex<()>,
    /// Self-reference handed to the spawned flush timer
    weak: Weak<Session>,
}

struct BufferState {
    fragments: FragmentBuffers,
    buffered_total: u64,
    /// Cancellation handle for the armed flush timer; `Some` is the
    /// "flush scheduled" marker, taken at the start of the active flush
    pending_flush: Option<Arc<Notify>>,
}

impl Session {
    /// Opens a session, creating its transcript log.
    ///
    /// Failing to create the log is a hard error surfaced to the caller.
    pub async fn open(
        config: SessionConfig,
        names: Arc<SpeakerNames>,
        recognizer: Arc<dyn Recognizer>,
        channel: Arc<dyn OutputChannel>,
    ) -> Result<Arc<Self>> {
        let sink = TranscriptSink::create(
            &config.data_dir,
            &config.session_key,
            Arc::clone(&channel),
            config.similarity_threshold,
        )
        .await?;

        let segmenter = Segmenter::new(config.sample_rate, config.max_segment_secs);

        info!("Transcription session started: {}", config.session_key);

        Ok(Arc::new_cyclic(|weak| Self {
            config,
            names,
            recognizer,
            channel,
            segmenter,
            sink,
            started_at: Utc::now(),
            state: Mutex::new(BufferState {
                fragments: FragmentBuffers::new(),
                buffered_total: 0,
                pending_flush: None,
            }),
            flush_gate: Mutex::new(()),
            weak: weak.clone(),
        }))
    }

    pub fn key(&self) -> &str {
        &self.config.session_key
    }

    /// Runs one finalized capture through segmentation, recognition, and
    /// buffering. Segments are recognized sequentially so the capture's
    /// fragments are buffered in time order.
    ///
    /// Malformed PCM and recognition failures are logged and dropped
    /// here; they never propagate to the session.
    pub async fn ingest_utterance(
        &self,
        speaker_id: &str,
        username: &str,
        pcm: &[u8],
        channels: u16,
        start_ms: u64,
        end_ms: u64,
    ) {
        let frames = pcm.len() / 2 / channels.max(1) as usize;
        let duration_ms = frames as u64 * 1000 / self.config.sample_rate as u64;
        if duration_ms < self.config.min_utterance_ms {
            debug!(
                "Capture of {}ms from {} is below the minimum, skipping",
                duration_ms, username
            );
            return;
        }

        let segments = match self.segmenter.segment(pcm, channels, start_ms, end_ms) {
            Ok(segments) => segments,
            Err(e) => {
                warn!("Dropping malformed capture from {}: {}", username, e);
                return;
            }
        };

        for segment in segments {
            match self
                .recognizer
                .recognize(&segment, &self.config.language)
                .await
            {
                Ok(Some(text)) => {
                    self.buffer(Fragment {
                        speaker_id: speaker_id.to_string(),
                        username: username.to_string(),
                        text,
                        start_ms: segment.start_ms,
                        end_ms: segment.end_ms,
                    })
                    .await;
                }
                Ok(None) => {
                    debug!("No text recognized for segment at {}ms", segment.start_ms);
                }
                Err(e) => {
                    error!(
                        "Recognition failed for segment at {}ms: {e:#}",
                        segment.start_ms
                    );
                }
            }
        }
    }

    /// Appends a fragment to its speaker's pending buffer, arming the
    /// session's flush timer if none is outstanding.
    pub async fn buffer(&self, fragment: Fragment) {
        let mut state = self.state.lock().await;

        debug!(
            "Buffered fragment from {} at {}ms: {:?}",
            fragment.username, fragment.start_ms, fragment.text
        );

        state.fragments.push(fragment);
        state.buffered_total += 1;

        if state.pending_flush.is_none() {
            state.pending_flush = Some(self.arm_flush_timer());
        }
    }

    /// Spawns the debounce timer. The returned handle cancels it while
    /// it is still sleeping; once it has entered `flush`, cancellation
    /// has no effect and the flush runs to completion.
    fn arm_flush_timer(&self) -> Arc<Notify> {
        let cancel = Arc::new(Notify::new());
        let cancelled = Arc::clone(&cancel);
        let window = self.config.buffer_window;

        if let Some(session) = self.weak.upgrade() {
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(window) => session.flush().await,
                    _ = cancelled.notified() => {}
                }
            });
        }

        cancel
    }

    /// Drains all buffered fragments into chronologically ordered,
    /// chunked, delivered messages.
    ///
    /// Serialized per session: a second flush request waits for the
    /// in-flight one and then finds the buffers empty. Flushing with no
    /// pending fragments delivers nothing and arms no timer.
    pub async fn flush(&self) {
        let _gate = self.flush_gate.lock().await;

        let drained = {
            let mut state = self.state.lock().await;
            if let Some(cancel) = state.pending_flush.take() {
                cancel.notify_one();
            }
            state.fragments.drain()
        };

        if drained.is_empty() {
            return;
        }

        let utterances = assemble_utterances(drained, self.config.silence_threshold_ms);

        debug!(
            "Flushing {} utterances for session {}",
            utterances.len(),
            self.config.session_key
        );

        for utterance in &utterances {
            let display = self.names.display_name(&utterance.username);
            for chunk in chunk_message(display, &utterance.text, self.config.char_limit) {
                self.sink.deliver(&chunk).await;
            }
        }

        // Fragments may have arrived while chunks were being delivered;
        // they wait for their own flush window.
        let mut state = self.state.lock().await;
        if !state.fragments.is_empty() && state.pending_flush.is_none() {
            state.pending_flush = Some(self.arm_flush_timer());
        }
    }

    /// Final forced flush, log finalization, and transcript export.
    ///
    /// A timer still sleeping is cancelled first; a flush already in
    /// progress completes before the forced one drains what is left.
    pub async fn close(&self) -> Result<()> {
        info!("Closing transcription session: {}", self.config.session_key);

        {
            let mut state = self.state.lock().await;
            if let Some(cancel) = state.pending_flush.take() {
                cancel.notify_one();
            }
        }

        self.flush().await;
        self.sink.finalize().await?;
        self.export_transcript().await;

        Ok(())
    }

    /// Sends the finalized log to the output channel as a file
    /// attachment, removing it on success. Export failures keep the file
    /// on disk and never fail the close.
    async fn export_transcript(&self) {
        let path = self.sink.path();

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                error!("Failed to read transcript log for export: {e:#}");
                return;
            }
        };

        if contents.trim().is_empty() {
            info!("No transcript recorded for session {}", self.key());
            return;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("transcript.log");

        match self.channel.send_file(name, &contents).await {
            Ok(()) => {
                if let Err(e) = tokio::fs::remove_file(path).await {
                    warn!("Failed to remove exported transcript log: {e:#}");
                } else {
                    info!("Transcript exported and removed: {}", path.display());
                }
            }
            Err(e) => {
                error!(
                    "Failed to export transcript, keeping {}: {e:#}",
                    path.display()
                );
            }
        }
    }

    /// Chunks delivered so far, in delivery order
    pub async fn transcript(&self) -> Vec<String> {
        self.sink.history().await
    }

    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        let (pending_fragments, buffered_fragments) = {
            let state = self.state.lock().await;
            (state.fragments.pending_count(), state.buffered_total)
        };

        SessionStats {
            session_key: self.config.session_key.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            pending_fragments,
            buffered_fragments,
            delivered_lines: self.sink.delivered().await,
            suppressed_duplicates: self.sink.suppressed().await,
        }
    }
}
