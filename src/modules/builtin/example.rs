//! Example module - smallest useful module, ships one command

use async_trait::async_trait;
use tracing::info;

use crate::application::errors::ModuleError;
use crate::domain::entities::Command;
use super::super::descriptor::{Module, ModuleDescriptor};

pub const NAME: &str = "example";

pub struct ExampleModule;

impl ExampleModule {
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new(NAME, |_bot| Box::new(ExampleModule)).requires(super::core::NAME)
    }

    /// Commands this module contributes through the extension loader
    pub fn commands() -> Vec<Command> {
        vec![Command::new("example")
            .with_description("Check that the example module responds")
            .with_handler(|_| Ok("Example module is working!".to_string()))]
    }
}

#[async_trait]
impl Module for ExampleModule {
    fn name(&self) -> &str {
        NAME
    }

    async fn setup(&mut self) -> Result<(), ModuleError> {
        info!("Example module started");
        Ok(())
    }

    async fn teardown(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }
}
