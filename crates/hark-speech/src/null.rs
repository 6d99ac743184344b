use crate::engine::SttEngine;
use hark_core::SttError;
use std::path::Path;

/// Recognizes nothing. Keeps the binary runnable without a model present;
/// every capture comes back as the empty utterance.
pub struct NullStt {
    call_count: usize,
}

impl NullStt {
    pub fn new() -> Self {
        Self { call_count: 0 }
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }
}

impl Default for NullStt {
    fn default() -> Self {
        Self::new()
    }
}

impl SttEngine for NullStt {
    fn name(&self) -> &str {
        "null"
    }

    fn initialize(&mut self, _config: toml::Value) -> Result<(), SttError> {
        Ok(())
    }

    fn transcribe_wav(&mut self, path: &Path) -> Result<Vec<String>, SttError> {
        self.call_count += 1;
        tracing::trace!(path = %path.display(), "NullStt consumed capture #{}", self.call_count);
        Ok(Vec::new())
    }
}
