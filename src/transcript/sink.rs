use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::similarity::is_similar;
use crate::channel::OutputChannel;

/// Delivers ordered transcript chunks to the output channel and appends
/// them to the session's durable log file.
///
/// A chunk near-identical to the previously delivered one is suppressed
/// entirely (not sent, not logged) to absorb the recognizer re-emitting
/// overlapping text across adjacent segment boundaries. For surviving
/// chunks the log append happens before the channel send, so the log is
/// the durability backstop when delivery fails; sends are at-most-once
/// and never retried.
pub struct TranscriptSink {
    path: PathBuf,
    similarity_threshold: f64,
    channel: Arc<dyn OutputChannel>,
    inner: Mutex<SinkState>,
}

struct SinkState {
    writer: Option<File>,
    last_sent: Option<String>,
    history: Vec<String>,
    suppressed: u64,
}

impl TranscriptSink {
    /// Opens a fresh append-only log file for one session.
    ///
    /// Failing to open the log is a hard error: the session cannot offer
    /// durability without it and is not created.
    pub async fn create(
        data_dir: impl AsRef<Path>,
        session_key: &str,
        channel: Arc<dyn OutputChannel>,
        similarity_threshold: f64,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = data_dir.join(format!("transcript-{session_key}-{timestamp}.log"));

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to create transcript log {}", path.display()))?;

        info!("Transcript log created: {}", path.display());

        Ok(Self {
            path,
            similarity_threshold,
            channel,
            inner: Mutex::new(SinkState {
                writer: Some(writer),
                last_sent: None,
                history: Vec::new(),
                suppressed: 0,
            }),
        })
    }

    /// Delivers one chunk: duplicate check, log append, channel send,
    /// history append, in that order. Per-chunk failures are logged and
    /// isolated; they never abort the flush that issued the delivery.
    pub async fn deliver(&self, chunk: &str) {
        let mut state = self.inner.lock().await;

        if let Some(last) = &state.last_sent {
            if is_similar(chunk, last, self.similarity_threshold) {
                state.suppressed += 1;
                debug!(
                    "Suppressed near-duplicate chunk ({} total): {}",
                    state.suppressed, chunk
                );
                return;
            }
        }

        if let Some(writer) = &mut state.writer {
            if let Err(e) = append_line(writer, chunk).await {
                error!("Failed to append to transcript log: {e:#}");
            }
        }

        if let Err(e) = self.channel.send(chunk).await {
            error!("Failed to deliver chunk to output channel: {e:#}");
        }

        state.last_sent = Some(chunk.to_string());
        state.history.push(chunk.to_string());
    }

    /// Flushes and closes the log file; further deliveries skip the log
    pub async fn finalize(&self) -> Result<()> {
        let mut state = self.inner.lock().await;
        if let Some(mut writer) = state.writer.take() {
            writer
                .flush()
                .await
                .context("Failed to flush transcript log")?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every chunk delivered so far, in delivery order
    pub async fn history(&self) -> Vec<String> {
        self.inner.lock().await.history.clone()
    }

    pub async fn delivered(&self) -> usize {
        self.inner.lock().await.history.len()
    }

    pub async fn suppressed(&self) -> u64 {
        self.inner.lock().await.suppressed
    }
}

async fn append_line(writer: &mut File, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}
