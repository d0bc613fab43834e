// Adapters layer: concrete implementations of the domain ports.

pub mod recognizer;
pub mod storage;

pub use recognizer::TranscriptRecognizer;
pub use storage::LocalStorage;
