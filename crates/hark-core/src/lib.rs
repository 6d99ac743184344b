pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, AppTargets, TriggerMode};
pub use error::{ActionError, AudioError, ConfigError, SpeechError, SttError, TriggerError};
pub use types::{AudioBuffer, AudioDeviceCandidate, CaptureConfig, Utterance};
