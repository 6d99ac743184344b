use crate::engine::SttEngine;
use hark_core::SttError;
use std::collections::HashMap;

pub struct SttRegistry {
    factories: HashMap<String, fn() -> Box<dyn SttEngine>>,
}

impl SttRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || Box::new(crate::null::NullStt::new()));
        #[cfg(feature = "whisper")]
        registry.register("whisper", || {
            Box::new(crate::whisper::WhisperStt::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn SttEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn SttEngine>, SttError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| SttError::EngineNotFound(name.to_string()))
    }

    pub fn list_engines(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for SttRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new_has_null_engine() {
        let registry = SttRegistry::new();
        let engine = registry.create("null").unwrap();
        assert_eq!(engine.name(), "null");
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = SttRegistry::new();
        match registry.create("nonexistent") {
            Err(SttError::EngineNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("expected EngineNotFound"),
        }
    }

    #[test]
    fn test_registry_list_engines_includes_null() {
        let registry = SttRegistry::new();
        assert!(registry.list_engines().contains(&"null"));
    }
}
