//! Transcript assembly: fragment buffering, utterance grouping,
//! chunking, duplicate suppression, and ordered delivery.

pub mod aggregator;
pub mod chunker;
pub mod similarity;
pub mod sink;
pub mod speakers;

pub use aggregator::{assemble_utterances, Fragment, FragmentBuffers, Utterance};
pub use chunker::chunk_message;
pub use similarity::{is_similar, similarity};
pub use sink::TranscriptSink;
pub use speakers::SpeakerNames;
