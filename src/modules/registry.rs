//! Module registry - maps module names to their descriptors

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::application::errors::ModuleError;
use super::descriptor::ModuleDescriptor;

/// Registry of known modules, keyed by unique name.
///
/// Built once during startup composition and injected into the manager;
/// registration after that point never happens in normal operation, so the
/// manager only ever borrows it immutably.
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Register a module descriptor.
    ///
    /// Fails with [`ModuleError::DuplicateModule`] if the name is empty or a
    /// descriptor with the same name is already registered. On success the
    /// stored descriptor is returned so registration can double as a
    /// declaration point.
    pub fn register(
        &mut self,
        descriptor: ModuleDescriptor,
    ) -> Result<&ModuleDescriptor, ModuleError> {
        let name = descriptor.name().to_string();
        if name.is_empty() {
            return Err(ModuleError::DuplicateModule(
                "<module with empty name>".to_string(),
            ));
        }

        match self.modules.entry(name) {
            Entry::Occupied(entry) => Err(ModuleError::DuplicateModule(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(descriptor)),
        }
    }

    /// Look up a descriptor by name
    pub fn lookup(&self, name: &str) -> Result<&ModuleDescriptor, ModuleError> {
        self.modules
            .get(name)
            .ok_or_else(|| ModuleError::UnknownModule(vec![name.to_string()]))
    }

    /// Check whether a module name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// All registered module names
    pub fn names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Defensive copy of the full registry table
    pub fn all(&self) -> HashMap<String, ModuleDescriptor> {
        self.modules.clone()
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::noop_module;

    #[test]
    fn register_and_lookup() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(noop_module("stats").requires("core"))
            .unwrap();

        let descriptor = registry.lookup("stats").unwrap();
        assert_eq!(descriptor.name(), "stats");
        assert!(descriptor.required_modules().contains("core"));
    }

    #[test]
    fn duplicate_name_is_rejected_and_original_survives() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(noop_module("stats").requires("core"))
            .unwrap();

        let err = registry.register(noop_module("stats")).unwrap_err();
        assert!(matches!(err, ModuleError::DuplicateModule(name) if name == "stats"));

        // The first descriptor is still the one resolvable
        let descriptor = registry.lookup("stats").unwrap();
        assert!(descriptor.required_modules().contains("core"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = ModuleRegistry::new();
        let err = registry.register(noop_module("")).unwrap_err();
        assert!(matches!(err, ModuleError::DuplicateModule(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_unknown_fails() {
        let registry = ModuleRegistry::new();
        let err = registry.lookup("ghost").unwrap_err();
        assert!(matches!(err, ModuleError::UnknownModule(names) if names == vec!["ghost"]));
    }

    #[test]
    fn all_returns_a_copy() {
        let mut registry = ModuleRegistry::new();
        registry.register(noop_module("stats")).unwrap();

        let mut copy = registry.all();
        copy.clear();
        assert_eq!(registry.len(), 1);
    }
}
