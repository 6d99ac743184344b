pub mod adapter;
pub mod engine;
pub mod null;
pub mod registry;
pub mod speaker;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use adapter::Transcriber;
pub use engine::SttEngine;
pub use null::NullStt;
pub use registry::SttRegistry;
pub use speaker::{create_speech_engine, ConsoleSpeech, NullSpeech, Speaker, SpeechEngine};
#[cfg(feature = "whisper")]
pub use whisper::WhisperStt;
