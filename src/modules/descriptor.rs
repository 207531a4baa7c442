//! Module trait and descriptor definitions

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::application::errors::ModuleError;
use crate::domain::traits::Bot;

/// Core trait that every module instance implements.
///
/// Instances are created per activation by the descriptor factory and are
/// owned exclusively by the module manager until deactivation. A module
/// deactivated and enabled again gets a fresh instance.
#[async_trait]
pub trait Module: Send + Sync {
    /// Unique name, matching the registered descriptor
    fn name(&self) -> &str;

    /// Called once after instantiation, before the module is recorded active.
    /// May suspend (wait on the transport, perform I/O).
    async fn setup(&mut self) -> Result<(), ModuleError>;

    /// Called once when the module is deactivated
    async fn teardown(&mut self) -> Result<(), ModuleError>;
}

/// Factory producing a fresh module instance bound to the transport handle
pub type ModuleFactory = Arc<dyn Fn(Arc<dyn Bot>) -> Box<dyn Module> + Send + Sync>;

/// Registered identity of a module: its name, the names of the modules it
/// requires, and the factory that builds its instances.
///
/// Descriptors are immutable once registered.
#[derive(Clone)]
pub struct ModuleDescriptor {
    name: String,
    required_modules: HashSet<String>,
    factory: ModuleFactory,
}

impl ModuleDescriptor {
    pub fn new(
        name: impl Into<String>,
        factory: impl Fn(Arc<dyn Bot>) -> Box<dyn Module> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            required_modules: HashSet::new(),
            factory: Arc::new(factory),
        }
    }

    /// Declare a dependency on another module
    pub fn requires(mut self, module: impl Into<String>) -> Self {
        self.required_modules.insert(module.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_modules(&self) -> &HashSet<String> {
        &self.required_modules
    }

    /// Build a fresh instance bound to the given transport handle
    pub fn instantiate(&self, bot: Arc<dyn Bot>) -> Box<dyn Module> {
        (self.factory)(bot)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("required_modules", &self.required_modules)
            .finish()
    }
}
