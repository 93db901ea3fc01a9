pub mod client;
pub mod messages;

pub use client::{listen_for_utterances, NatsChannel, NatsRecognizer};
pub use messages::{
    RecognizeRequest, RecognizeResponse, RecognizeResult, TranscriptFileMessage,
    TranscriptLineMessage, UtteranceMessage,
};
