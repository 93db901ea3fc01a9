use thiserror::Error;

/// Errors raised for PCM buffers that cannot be interpreted as whole
/// 16-bit frames. The caller is expected to log these and drop the
/// capture; they never terminate a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("PCM buffer of {0} bytes is not a whole number of 16-bit samples")]
    OddByteLength(usize),

    #[error("{samples} samples is not a whole number of {channels}-channel frames")]
    TruncatedFrame { samples: usize, channels: u16 },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),
}

/// One recognizer-sized slice of a captured utterance (mono 16-bit PCM)
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Mono samples at the session sample rate
    pub samples: Vec<i16>,
    /// Wall-clock start in milliseconds since epoch
    pub start_ms: u64,
    /// Wall-clock end in milliseconds since epoch
    pub end_ms: u64,
}

impl AudioSegment {
    /// Little-endian PCM bytes, the layout the recognition service expects
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Slices one captured utterance into bounded-duration mono segments.
///
/// Pure over its inputs: the same buffer and timing always produce the
/// same segment sequence.
#[derive(Debug, Clone)]
pub struct Segmenter {
    sample_rate: u32,
    max_segment_secs: u64,
}

impl Segmenter {
    pub fn new(sample_rate: u32, max_segment_secs: u64) -> Self {
        Self {
            sample_rate,
            max_segment_secs,
        }
    }

    /// Maximum mono samples a single segment may carry
    pub fn max_samples_per_segment(&self) -> usize {
        (self.max_segment_secs * self.sample_rate as u64) as usize
    }

    /// Splits a raw little-endian PCM capture into ordered mono segments.
    ///
    /// `start_ms`/`end_ms` are the wall-clock bounds of the whole capture;
    /// each yielded segment carries its own bounds derived from its sample
    /// offset. The final segment ends at `end_ms` exactly. An empty buffer
    /// yields an empty sequence, which callers treat as nothing to
    /// transcribe rather than an error.
    pub fn segment(
        &self,
        pcm: &[u8],
        channels: u16,
        start_ms: u64,
        end_ms: u64,
    ) -> Result<Segments, FormatError> {
        if pcm.len() % 2 != 0 {
            return Err(FormatError::OddByteLength(pcm.len()));
        }
        if channels == 0 || channels > 2 {
            return Err(FormatError::UnsupportedChannels(channels));
        }

        let sample_count = pcm.len() / 2;
        if sample_count % channels as usize != 0 {
            return Err(FormatError::TruncatedFrame {
                samples: sample_count,
                channels,
            });
        }

        let samples = decode_mono(pcm, channels);

        Ok(Segments {
            samples,
            offset: 0,
            max_samples: self.max_samples_per_segment(),
            sample_rate: self.sample_rate,
            max_segment_ms: self.max_segment_secs * 1000,
            start_ms,
            end_ms,
        })
    }
}

/// Decodes little-endian 16-bit PCM, downmixing stereo to mono by
/// summing channels with clamping.
fn decode_mono(pcm: &[u8], channels: u16) -> Vec<i16> {
    let decoded = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]));

    if channels == 1 {
        return decoded.collect();
    }

    let mut mono = Vec::with_capacity(pcm.len() / 4);
    let interleaved: Vec<i16> = decoded.collect();
    for frame in interleaved.chunks_exact(2) {
        let sum = frame[0] as i32 + frame[1] as i32;
        mono.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
    }
    mono
}

/// Lazy, finite iterator over the segments of one capture
pub struct Segments {
    samples: Vec<i16>,
    offset: usize,
    max_samples: usize,
    sample_rate: u32,
    max_segment_ms: u64,
    start_ms: u64,
    end_ms: u64,
}

impl Iterator for Segments {
    type Item = AudioSegment;

    fn next(&mut self) -> Option<AudioSegment> {
        if self.offset >= self.samples.len() {
            return None;
        }

        let end = (self.offset + self.max_samples).min(self.samples.len());
        let seg_start = self.start_ms + (self.offset as u64 * 1000) / self.sample_rate as u64;
        let seg_end = (seg_start + self.max_segment_ms).min(self.end_ms);

        let segment = AudioSegment {
            samples: self.samples[self.offset..end].to_vec(),
            start_ms: seg_start,
            end_ms: seg_end,
        };

        self.offset = end;

        Some(segment)
    }
}
