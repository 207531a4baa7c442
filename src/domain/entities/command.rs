use std::sync::Arc;

use crate::application::errors::CommandError;
use super::Message;

/// Handler closure invoked with the triggering message
pub type CommandHandler = Arc<dyn Fn(Message) -> Result<String, CommandError> + Send + Sync>;

/// A user-facing command.
///
/// Commands registered by a module carry that module's name and are gated by
/// tenant enablement at dispatch time; commands without an owning module
/// (help, version) are always available.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub usage: Option<String>,
    pub module: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            usage: None,
            module: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Bind this command to the module that owns it
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_handler(
        mut self,
        handler: impl Fn(Message) -> Result<String, CommandError> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("module", &self.module)
            .finish()
    }
}
