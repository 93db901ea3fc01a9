use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Static mapping from raw speaker usernames to preferred display names.
///
/// Loaded once at startup; lookups are lower-cased and fall back to the
/// raw name when no mapping exists.
#[derive(Debug, Default)]
pub struct SpeakerNames {
    names: HashMap<String, String>,
}

impl SpeakerNames {
    /// Loads the mapping from a JSON object of `raw name -> display name`.
    ///
    /// A missing file is not fatal: transcripts then show raw usernames.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(
                "Speaker name mapping not found at {}, using raw usernames",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read speaker names from {}", path.display()))?;
        let parsed: HashMap<String, String> =
            serde_json::from_str(&raw).context("Speaker name mapping is not a JSON object")?;

        info!("Loaded {} speaker name mappings", parsed.len());

        Ok(Self::from_map(parsed))
    }

    pub fn from_map(names: HashMap<String, String>) -> Self {
        let names = names
            .into_iter()
            .map(|(raw, display)| (raw.to_lowercase(), display))
            .collect();
        Self { names }
    }

    pub fn display_name<'a>(&'a self, raw: &'a str) -> &'a str {
        self.names
            .get(&raw.to_lowercase())
            .map(String::as_str)
            .unwrap_or(raw)
    }
}
