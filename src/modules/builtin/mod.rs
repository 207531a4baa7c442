//! Modules shipped with the bot.
//!
//! Registration is a static table built here at startup, not a runtime
//! discovery walk; adding a module means adding its descriptor to
//! [`builtin_registry`].

pub mod core;
pub mod example;

use crate::application::errors::ModuleError;
use super::registry::ModuleRegistry;

/// Modules force-enabled in every activation batch
pub const ESSENTIAL_MODULES: &[&str] = &[core::NAME];

/// Registry of every module shipped with the application
pub fn builtin_registry() -> Result<ModuleRegistry, ModuleError> {
    let mut registry = ModuleRegistry::new();
    registry.register(core::CoreModule::descriptor())?;
    registry.register(example::ExampleModule::descriptor())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_contains_every_shipped_module() {
        let registry = builtin_registry().unwrap();
        assert!(registry.contains(core::NAME));
        assert!(registry.contains(example::NAME));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn essential_modules_are_registered() {
        let registry = builtin_registry().unwrap();
        for name in ESSENTIAL_MODULES {
            assert!(registry.contains(name));
        }
    }
}
