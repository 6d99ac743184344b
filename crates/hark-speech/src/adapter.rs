use crate::engine::SttEngine;
use hark_core::{AudioBuffer, SttError, Utterance};

/// Bridges a finished capture to the STT engine.
///
/// The buffer is staged as a scratch mono 16-bit WAV whose backing file is
/// removed when the temp handle drops, on the success path and on every
/// error path alike. Segments come back in order and are joined with single
/// spaces; whitespace-only output maps to the empty utterance.
pub struct Transcriber {
    engine: Box<dyn SttEngine>,
}

impl Transcriber {
    pub fn new(engine: Box<dyn SttEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn transcribe(&mut self, buffer: AudioBuffer) -> Result<Utterance, SttError> {
        let scratch = tempfile::Builder::new()
            .prefix("hark_cmd_")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| SttError::Staging(e.to_string()))?;

        hark_audio::write_wav(&buffer, scratch.path())
            .map_err(|e| SttError::Staging(e.to_string()))?;

        tracing::debug!(
            samples = buffer.len(),
            rate = buffer.sample_rate,
            "staged capture for transcription"
        );

        let segments = self.engine.transcribe_wav(scratch.path())?;

        let joined = segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Utterance::from_raw(&joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    /// Returns a fixed script of segments and records the WAV path it saw.
    struct ScriptedStt {
        segments: Vec<String>,
        fail: bool,
        seen_path: Arc<Mutex<Option<PathBuf>>>,
    }

    impl SttEngine for ScriptedStt {
        fn name(&self) -> &str {
            "scripted"
        }

        fn initialize(&mut self, _config: toml::Value) -> Result<(), SttError> {
            Ok(())
        }

        fn transcribe_wav(&mut self, path: &Path) -> Result<Vec<String>, SttError> {
            assert!(path.exists(), "scratch WAV should exist during the call");
            *self.seen_path.lock().unwrap() = Some(path.to_path_buf());
            if self.fail {
                return Err(SttError::Transcription("engine exploded".to_string()));
            }
            Ok(self.segments.clone())
        }
    }

    fn make_transcriber(
        segments: Vec<&str>,
        fail: bool,
    ) -> (Transcriber, Arc<Mutex<Option<PathBuf>>>) {
        let seen_path = Arc::new(Mutex::new(None));
        let engine = ScriptedStt {
            segments: segments.into_iter().map(String::from).collect(),
            fail,
            seen_path: Arc::clone(&seen_path),
        };
        (Transcriber::new(Box::new(engine)), seen_path)
    }

    fn buffer() -> AudioBuffer {
        AudioBuffer {
            samples: vec![0i16; 1600],
            sample_rate: 16000,
        }
    }

    #[test]
    fn test_segments_joined_in_order_with_single_spaces() {
        let (mut transcriber, _) = make_transcriber(vec![" Open ", "Chrome ", " now"], false);
        let utterance = transcriber.transcribe(buffer()).unwrap();
        assert_eq!(utterance.as_str(), "open chrome now");
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let (mut transcriber, _) = make_transcriber(vec!["", "  ", "hello", ""], false);
        let utterance = transcriber.transcribe(buffer()).unwrap();
        assert_eq!(utterance.as_str(), "hello");
    }

    #[test]
    fn test_whitespace_only_output_is_the_empty_utterance() {
        let (mut transcriber, _) = make_transcriber(vec!["   ", "\t"], false);
        let utterance = transcriber.transcribe(buffer()).unwrap();
        assert!(utterance.is_empty());
    }

    #[test]
    fn test_no_segments_is_the_empty_utterance() {
        let (mut transcriber, _) = make_transcriber(vec![], false);
        assert!(transcriber.transcribe(buffer()).unwrap().is_empty());
    }

    #[test]
    fn test_scratch_wav_removed_after_success() {
        let (mut transcriber, seen_path) = make_transcriber(vec!["hi"], false);
        transcriber.transcribe(buffer()).unwrap();
        let path = seen_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_wav_removed_after_engine_failure() {
        let (mut transcriber, seen_path) = make_transcriber(vec![], true);
        let result = transcriber.transcribe(buffer());
        assert!(result.is_err());
        let path = seen_path.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_engine_failure_propagates_untouched() {
        let (mut transcriber, _) = make_transcriber(vec![], true);
        match transcriber.transcribe(buffer()) {
            Err(SttError::Transcription(msg)) => assert!(msg.contains("exploded")),
            _ => panic!("expected Transcription error"),
        }
    }
}
