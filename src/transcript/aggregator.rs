//! Groups timestamped recognition fragments into coherent utterances.
//!
//! Fragments accumulate per speaker between flushes. At flush time the
//! whole batch is ordered chronologically and coalesced: consecutive
//! fragments from one speaker whose start times fall within the silence
//! threshold become one message, while fragments from other speakers may
//! interleave without breaking that run. Emitted messages are ordered by
//! their first fragment's start time.

use std::collections::HashMap;

/// One speaker's recognized text for one audio segment
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Stable speaker identity from the voice session
    pub speaker_id: String,
    /// Raw username, resolved to a display name at render time
    pub username: String,
    /// Recognized text; empty text is valid and dropped at flush
    pub text: String,
    /// Wall-clock start in milliseconds since epoch
    pub start_ms: u64,
    /// Wall-clock end in milliseconds since epoch
    pub end_ms: u64,
}

/// A coalesced run of fragments from one speaker
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker_id: String,
    pub username: String,
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Per-speaker pending fragments for one session.
///
/// Arrival order is stamped on insertion so that flush-time sorting can
/// break start-time ties deterministically.
#[derive(Debug, Default)]
pub struct FragmentBuffers {
    buffers: HashMap<String, Vec<(u64, Fragment)>>,
    next_arrival: u64,
}

impl FragmentBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        self.buffers
            .entry(fragment.speaker_id.clone())
            .or_default()
            .push((arrival, fragment));
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.values().all(|pending| pending.is_empty())
    }

    pub fn pending_count(&self) -> usize {
        self.buffers.values().map(Vec::len).sum()
    }

    /// Takes every speaker's pending fragments, leaving the buffers empty
    pub fn drain(&mut self) -> Vec<(u64, Fragment)> {
        self.buffers.drain().flat_map(|(_, pending)| pending).collect()
    }
}

/// Orders a drained batch chronologically and coalesces it into utterances.
///
/// A fragment joins the speaker's open utterance when its start time is
/// within `silence_threshold_ms` of that utterance's last fragment start;
/// otherwise it opens a new one. Empty and whitespace-only fragments are
/// dropped. The returned utterances are ordered by first-fragment start
/// time, with start-time ties resolved by arrival order.
pub fn assemble_utterances(
    mut drained: Vec<(u64, Fragment)>,
    silence_threshold_ms: u64,
) -> Vec<Utterance> {
    drained.sort_by_key(|(arrival, fragment)| (fragment.start_ms, *arrival));

    struct OpenUtterance {
        utterance: Utterance,
        last_start_ms: u64,
    }

    let mut builders: Vec<OpenUtterance> = Vec::new();
    let mut open: HashMap<String, usize> = HashMap::new();

    for (_, fragment) in drained {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }

        let joined = match open.get(&fragment.speaker_id) {
            Some(&idx)
                if fragment.start_ms.saturating_sub(builders[idx].last_start_ms)
                    <= silence_threshold_ms =>
            {
                let builder = &mut builders[idx];
                builder.utterance.text.push(' ');
                builder.utterance.text.push_str(text);
                builder.utterance.end_ms = fragment.end_ms;
                builder.last_start_ms = fragment.start_ms;
                true
            }
            _ => false,
        };

        if !joined {
            open.insert(fragment.speaker_id.clone(), builders.len());
            builders.push(OpenUtterance {
                last_start_ms: fragment.start_ms,
                utterance: Utterance {
                    speaker_id: fragment.speaker_id,
                    username: fragment.username,
                    text: text.to_string(),
                    start_ms: fragment.start_ms,
                    end_ms: fragment.end_ms,
                },
            });
        }
    }

    builders.into_iter().map(|b| b.utterance).collect()
}
