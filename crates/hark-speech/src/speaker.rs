use hark_core::SpeechError;
use std::sync::Mutex;

/// Blocking speech synthesis backend. `speak` returns once playback has
/// completed.
pub trait SpeechEngine: Send {
    fn name(&self) -> &str;
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Console-only backend. The `Speaker` already echoes every line, so there
/// is nothing left to do.
pub struct ConsoleSpeech;

impl SpeechEngine for ConsoleSpeech {
    fn name(&self) -> &str {
        "console"
    }

    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Swallows output entirely; used in tests.
pub struct NullSpeech;

impl SpeechEngine for NullSpeech {
    fn name(&self) -> &str {
        "null"
    }

    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

pub fn create_speech_engine(name: &str) -> Result<Box<dyn SpeechEngine>, SpeechError> {
    match name {
        "console" => Ok(Box::new(ConsoleSpeech)),
        "null" => Ok(Box::new(NullSpeech)),
        other => Err(SpeechError::EngineNotFound(other.to_string())),
    }
}

/// The assistant's voice. Every line is echoed to the console and then
/// handed to the engine under a lock, so at most one utterance plays at a
/// time no matter how many call sites exist.
pub struct Speaker {
    prompt_name: String,
    engine: Mutex<Box<dyn SpeechEngine>>,
}

impl Speaker {
    pub fn new(prompt_name: &str, engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            prompt_name: prompt_name.to_string(),
            engine: Mutex::new(engine),
        }
    }

    /// Speak one line. Failures degrade to the console echo; this never
    /// propagates an error to the session loop.
    pub fn say(&self, text: &str) {
        println!("{}: {}", self.prompt_name, text);

        let mut engine = match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = engine.speak(text) {
            tracing::warn!("speech output failed: {e}");
        }
    }
}
