use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no input device available")]
    NoInputDevice,

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("input device not found: {0}")]
    DeviceNotFound(String),

    #[error("no working input configuration after {attempts} attempts (last error: {last})")]
    NegotiationExhausted { attempts: usize, last: String },

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("capture cancelled")]
    Cancelled,

    #[error("WAV encoding failed: {0}")]
    Wav(String),
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("wake engine not found: {0}")]
    EngineNotFound(String),

    #[error("wake engine initialization failed: {0}")]
    InitializationFailed(String),

    #[error("wake engine processing failed: {0}")]
    ProcessingFailed(String),

    #[error("failed to read trigger input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

#[derive(Debug, Error)]
pub enum SttError {
    #[error("STT engine not found: {0}")]
    EngineNotFound(String),

    #[error("STT initialization failed: {0}")]
    InitializationFailed(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("failed to stage audio for transcription: {0}")]
    Staging(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech engine not found: {0}")]
    EngineNotFound(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("'{key}' is not in the allowlist (allowed: {allowed})")]
    NotAllowlisted { key: String, allowed: String },

    #[error("failed to launch '{target}': {reason}")]
    LaunchFailed { target: String, reason: String },

    #[error("failed to write note: {0}")]
    NoteWrite(String),
}
