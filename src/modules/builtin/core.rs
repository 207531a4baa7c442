//! Core module - owns the transport connection lifecycle

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::errors::ModuleError;
use crate::domain::traits::Bot;
use super::super::descriptor::{Module, ModuleDescriptor};

pub const NAME: &str = "core";

/// The essential module. Its setup connects the transport and its teardown
/// disconnects it; no other component touches the transport lifecycle.
pub struct CoreModule {
    bot: Arc<dyn Bot>,
}

impl CoreModule {
    pub fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new(NAME, |bot| Box::new(CoreModule { bot }))
    }
}

#[async_trait]
impl Module for CoreModule {
    fn name(&self) -> &str {
        NAME
    }

    async fn setup(&mut self) -> Result<(), ModuleError> {
        self.bot
            .start()
            .await
            .map_err(|e| ModuleError::Setup(e.to_string()))
    }

    async fn teardown(&mut self) -> Result<(), ModuleError> {
        info!("Closing transport connection");
        self.bot
            .stop()
            .await
            .map_err(|e| ModuleError::Teardown(e.to_string()))
    }
}
