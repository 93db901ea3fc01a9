use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::config::SessionConfig;
use super::session::Session;
use crate::channel::OutputChannel;
use crate::recognize::Recognizer;
use crate::transcript::SpeakerNames;

/// Session lifecycle misuse and unrecoverable resource failures.
///
/// These surface to the operator-facing layer; everything softer is
/// handled and logged inside the pipeline.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} is already active")]
    AlreadyActive(String),

    #[error("session {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Resource(#[from] anyhow::Error),
}

struct SessionEntry {
    session: Arc<Session>,
    /// Background work feeding this session (utterance listeners),
    /// aborted on close
    tasks: Vec<JoinHandle<()>>,
}

/// Process-wide table of active transcription sessions.
///
/// The registry is the only owner of session lifecycles: at most one
/// session exists per key, and `close` releases every per-session
/// resource (timers, background tasks, log handle) before removal.
pub struct SessionRegistry {
    template: SessionConfig,
    names: Arc<SpeakerNames>,
    recognizer: Arc<dyn Recognizer>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(
        template: SessionConfig,
        names: Arc<SpeakerNames>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            template,
            names,
            recognizer,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a session for `key`, delivering transcripts to `channel`
    pub async fn open(
        &self,
        key: &str,
        channel: Arc<dyn OutputChannel>,
    ) -> Result<Arc<Session>, SessionError> {
        let mut sessions = self.sessions.lock().await;

        if sessions.contains_key(key) {
            return Err(SessionError::AlreadyActive(key.to_string()));
        }

        let config = self.template.with_key(key);
        let session = Session::open(
            config,
            Arc::clone(&self.names),
            Arc::clone(&self.recognizer),
            channel,
        )
        .await?;

        sessions.insert(
            key.to_string(),
            SessionEntry {
                session: Arc::clone(&session),
                tasks: Vec::new(),
            },
        );

        info!("Session registered: {}", key);

        Ok(session)
    }

    pub async fn get(&self, key: &str) -> Result<Arc<Session>, SessionError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(key)
            .map(|entry| Arc::clone(&entry.session))
            .ok_or_else(|| SessionError::NotFound(key.to_string()))
    }

    /// Hands a background task's handle to the session's entry so it is
    /// aborted when the session closes
    pub async fn attach_task(&self, key: &str, task: JoinHandle<()>) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;
        entry.tasks.push(task);
        Ok(())
    }

    /// Stops ingestion, force-flushes buffered fragments, finalizes the
    /// log, and removes the session
    pub async fn close(&self, key: &str) -> Result<(), SessionError> {
        let entry = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .remove(key)
                .ok_or_else(|| SessionError::NotFound(key.to_string()))?
        };

        for task in entry.tasks {
            task.abort();
        }

        entry.session.close().await?;

        info!("Session closed and removed: {}", key);

        Ok(())
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
