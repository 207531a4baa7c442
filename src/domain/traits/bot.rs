use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters.
///
/// The module manager never calls this directly; the handle is bound into
/// module instances at activation, and only the essential core module drives
/// start/stop.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Connect to the platform and begin listening for events
    async fn start(&self) -> Result<(), BotError>;

    /// Disconnect and stop listening
    async fn stop(&self) -> Result<(), BotError>;

    /// Send a message to a chat, returning the platform message id
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
