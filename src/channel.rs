use anyhow::Result;

/// Output channel boundary for delivered transcript chunks.
///
/// Sends are at-most-once: a failed send is logged by the caller and
/// never retried, the durable transcript log being the backstop.
#[async_trait::async_trait]
pub trait OutputChannel: Send + Sync {
    /// Sends one plain-text message, already sized to the channel's limit
    async fn send(&self, content: &str) -> Result<()>;

    /// Sends a named file attachment (the finalized transcript on close)
    async fn send_file(&self, name: &str, contents: &str) -> Result<()>;
}
