use crate::engine::SttEngine;
use hark_core::SttError;
use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Local whisper.cpp inference via whisper-rs. Loads a ggml model from
/// `model_path` at initialization.
pub struct WhisperStt {
    context: Option<WhisperContext>,
    language: Option<String>,
    threads: i32,
}

impl WhisperStt {
    pub fn new() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|p| (p.get().saturating_sub(1)).max(1) as i32)
            .unwrap_or(1);
        Self {
            context: None,
            language: None,
            threads,
        }
    }
}

impl Default for WhisperStt {
    fn default() -> Self {
        Self::new()
    }
}

impl SttEngine for WhisperStt {
    fn name(&self) -> &str {
        "whisper"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), SttError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                SttError::InitializationFailed("missing 'model_path' in stt config".to_string())
            })?;

        self.language = config
            .get("language")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let context =
            WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                .map_err(|e| SttError::InitializationFailed(e.to_string()))?;
        self.context = Some(context);

        tracing::info!(
            model_path,
            language = ?self.language,
            threads = self.threads,
            "whisper STT engine initialized"
        );
        Ok(())
    }

    fn transcribe_wav(&mut self, path: &Path) -> Result<Vec<String>, SttError> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| SttError::Transcription("engine not initialized".to_string()))?;

        let buffer =
            hark_audio::read_wav(path).map_err(|e| SttError::Transcription(e.to_string()))?;
        let samples: Vec<f32> = buffer
            .samples
            .iter()
            .map(|&s| f32::from(s) / 32768.0)
            .collect();

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.threads);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        if let Some(ref language) = self.language {
            params.set_language(Some(language));
        }

        let mut state = context
            .create_state()
            .map_err(|e| SttError::Transcription(e.to_string()))?;
        state
            .full(params, &samples)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let segment_count = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;
        let mut segments = Vec::with_capacity(segment_count as usize);
        for i in 0..segment_count {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(e.to_string()))?;
            segments.push(text);
        }

        tracing::debug!(segments = segments.len(), "whisper transcription complete");
        Ok(segments)
    }
}
