use hark_core::SttError;
use std::path::Path;

/// The speech-to-text engine's interface: a finished mono 16-bit WAV in,
/// ordered text segments out.
pub trait SttEngine: Send {
    fn name(&self) -> &str;
    fn initialize(&mut self, config: toml::Value) -> Result<(), SttError>;
    fn transcribe_wav(&mut self, path: &Path) -> Result<Vec<String>, SttError>;
}
