use crate::engine::WakeEngine;
use hark_core::TriggerError;
use std::collections::HashMap;

pub struct WakeEngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn WakeEngine>>,
}

impl WakeEngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("energy", || Box::new(crate::energy::EnergyEngine::new()));
        #[cfg(feature = "rustpotter")]
        registry.register("rustpotter", || {
            Box::new(crate::rustpotter_engine::RustpotterEngine::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn WakeEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn WakeEngine>, TriggerError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| TriggerError::EngineNotFound(name.to_string()))
    }

    pub fn list_engines(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for WakeEngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new_has_energy_engine() {
        let registry = WakeEngineRegistry::new();
        let engine = registry.create("energy").unwrap();
        assert_eq!(engine.name(), "energy");
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = WakeEngineRegistry::new();
        match registry.create("nope") {
            Err(TriggerError::EngineNotFound(name)) => assert_eq!(name, "nope"),
            _ => panic!("expected EngineNotFound error"),
        }
    }

    #[test]
    fn test_registry_list_engines_includes_energy() {
        let registry = WakeEngineRegistry::new();
        assert!(registry.list_engines().contains(&"energy"));
    }

    #[test]
    fn test_registry_register_custom_engine() {
        let mut registry = WakeEngineRegistry::new();
        registry.register("custom", || Box::new(crate::energy::EnergyEngine::new()));
        assert!(registry.create("custom").is_ok());
    }
}
