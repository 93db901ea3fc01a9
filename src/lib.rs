pub mod audio;
pub mod channel;
pub mod config;
pub mod http;
pub mod nats;
pub mod recognize;
pub mod session;
pub mod transcript;

pub use audio::{AudioSegment, FormatError, Segmenter};
pub use channel::OutputChannel;
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{listen_for_utterances, NatsChannel, NatsRecognizer, UtteranceMessage};
pub use recognize::Recognizer;
pub use session::{Session, SessionConfig, SessionError, SessionRegistry, SessionStats};
pub use transcript::{Fragment, SpeakerNames, TranscriptSink, Utterance};
