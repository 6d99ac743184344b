use crate::engine::WakeEngine;
use hark_core::TriggerError;

/// Frame rate the energy detector expects.
const SAMPLE_RATE: u32 = 16000;

/// Samples per frame handed to `process`.
const FRAME_LENGTH: usize = 512;

/// Sustained speech needed before triggering (0.3 seconds at 16kHz).
const MIN_SPEECH_SAMPLES: usize = 4800;

/// RMS burst detector: triggers once sustained energy crosses the
/// threshold. Credential-free stand-in for a trained keyword model, useful
/// for demos and as the default engine.
pub struct EnergyEngine {
    threshold: f32,
    speech_samples: usize,
}

impl EnergyEngine {
    pub fn new() -> Self {
        Self {
            threshold: 0.03,
            speech_samples: 0,
        }
    }
}

impl Default for EnergyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeEngine for EnergyEngine {
    fn name(&self) -> &str {
        "energy"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), TriggerError> {
        if let Some(threshold) = config.get("threshold").and_then(|v| v.as_float()) {
            if threshold <= 0.0 {
                return Err(TriggerError::InitializationFailed(
                    "wake.threshold must be positive".to_string(),
                ));
            }
            self.threshold = threshold as f32;
        }
        tracing::debug!(threshold = self.threshold, "energy wake engine initialized");
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn frame_length(&self) -> usize {
        FRAME_LENGTH
    }

    fn process(&mut self, frame: &[i16]) -> Result<i32, TriggerError> {
        let energy = rms_energy(frame);
        if energy > self.threshold {
            self.speech_samples += frame.len();
            if self.speech_samples >= MIN_SPEECH_SAMPLES {
                tracing::trace!(energy, "energy burst complete");
                self.speech_samples = 0;
                return Ok(0);
            }
        } else {
            self.speech_samples = 0;
        }
        Ok(-1)
    }
}

/// RMS energy of an int16 frame, normalized to [0, 1].
fn rms_energy(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = frame
        .iter()
        .map(|&s| {
            let normalized = f32::from(s) / 32768.0;
            normalized * normalized
        })
        .sum();
    (sum_squares / frame.len() as f32).sqrt()
}
