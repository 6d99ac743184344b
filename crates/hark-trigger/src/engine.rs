use hark_core::TriggerError;

/// The wake-word detector's interface: fixed-length int16 mono frames in,
/// a keyword index out. A non-negative index means "wake"; a negative
/// value means keep listening.
pub trait WakeEngine: Send {
    fn name(&self) -> &str;
    fn initialize(&mut self, config: toml::Value) -> Result<(), TriggerError>;
    /// Rate the engine's frames must be captured at.
    fn sample_rate(&self) -> u32;
    /// Frame length in samples.
    fn frame_length(&self) -> usize;
    fn process(&mut self, frame: &[i16]) -> Result<i32, TriggerError>;
}
