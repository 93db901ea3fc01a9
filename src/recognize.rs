use anyhow::Result;

use crate::audio::AudioSegment;

/// Speech recognition service boundary.
///
/// Implementations convert one audio segment into text. `Ok(None)` means
/// the service recognized nothing, which callers drop silently; an error
/// drops the fragment as well, with no retry. Neither outcome disturbs
/// the session.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, segment: &AudioSegment, language: &str) -> Result<Option<String>>;
}
