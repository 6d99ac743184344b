use crate::engine::WakeEngine;
use hark_core::TriggerError;
use rustpotter::{Rustpotter, RustpotterConfig, SampleFormat};

const SAMPLE_RATE: u32 = 16000;

/// Keyword-model wake engine backed by rustpotter. Requires a trained
/// `.rpw` model referenced by `keyword_path`.
pub struct RustpotterEngine {
    detector: Option<Rustpotter>,
    frame_length: usize,
}

impl RustpotterEngine {
    pub fn new() -> Self {
        Self {
            detector: None,
            frame_length: 0,
        }
    }
}

impl Default for RustpotterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeEngine for RustpotterEngine {
    fn name(&self) -> &str {
        "rustpotter"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), TriggerError> {
        let keyword_path = config
            .get("keyword_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                TriggerError::InitializationFailed(
                    "missing 'keyword_path' in wake config".to_string(),
                )
            })?;
        let threshold = config
            .get("threshold")
            .and_then(|v| v.as_float())
            .unwrap_or(0.5);

        let mut rp_config = RustpotterConfig::default();
        rp_config.fmt.sample_rate = SAMPLE_RATE as usize;
        rp_config.fmt.channels = 1;
        rp_config.fmt.sample_format = SampleFormat::F32;
        rp_config.detector.threshold = threshold as f32;

        let mut detector = Rustpotter::new(&rp_config)
            .map_err(|e| TriggerError::InitializationFailed(e.to_string()))?;
        detector
            .add_wakeword_from_file("wake", keyword_path)
            .map_err(|e| TriggerError::InitializationFailed(e.to_string()))?;

        self.frame_length = detector.get_samples_per_frame();
        self.detector = Some(detector);

        tracing::info!(keyword_path, threshold, "rustpotter wake engine initialized");
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn frame_length(&self) -> usize {
        self.frame_length
    }

    fn process(&mut self, frame: &[i16]) -> Result<i32, TriggerError> {
        let detector = self
            .detector
            .as_mut()
            .ok_or_else(|| TriggerError::ProcessingFailed("engine not initialized".to_string()))?;

        let samples: Vec<f32> = frame.iter().map(|&s| f32::from(s) / 32768.0).collect();
        Ok(if detector.process_f32(&samples).is_some() {
            0
        } else {
            -1
        })
    }
}
