//! Extension loading contract

use async_trait::async_trait;

use crate::application::errors::ModuleError;

/// Registers an activated module's user-facing extensions with the host.
///
/// Invoked by the manager once per activated module. A module that ships no
/// extensions is a no-op success, not an error; anything else that goes wrong
/// surfaces as [`ModuleError::Extension`].
#[async_trait]
pub trait ExtensionLoader: Send + Sync {
    async fn register_extensions(&self, module_name: &str) -> Result<(), ModuleError>;
}

/// Loader that registers nothing. For headless setups and tests.
pub struct NoExtensions;

#[async_trait]
impl ExtensionLoader for NoExtensions {
    async fn register_extensions(&self, _module_name: &str) -> Result<(), ModuleError> {
        Ok(())
    }
}
