/// Canonical capture artifact: single-channel, 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// A working (device, rate, channels) triple produced by negotiation.
/// Consumed exactly once per capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub capture_seconds: f32,
    pub block_frames: u32,
}

impl CaptureConfig {
    /// Exact sample count a capture with this config must produce.
    pub fn target_samples(&self) -> usize {
        (f64::from(self.capture_seconds) * f64::from(self.sample_rate)).round() as usize
    }
}

/// Immutable snapshot of one input device taken at negotiation time.
/// `rates` is the candidate ladder, preferred first, de-duplicated.
#[derive(Debug, Clone)]
pub struct AudioDeviceCandidate {
    pub name: String,
    pub rates: Vec<u32>,
    pub max_channels: u16,
}

/// Trimmed, lower-case-normalized transcription text.
///
/// The empty utterance is a distinguished value meaning "nothing usable
/// captured" and is never routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    pub fn from_raw(text: &str) -> Self {
        Self(text.trim().to_lowercase())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Utterance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
