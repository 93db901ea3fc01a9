pub mod segmenter;

pub use segmenter::{AudioSegment, FormatError, Segmenter, Segments};
