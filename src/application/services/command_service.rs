//! Command service - registration, parsing, and tenant-gated dispatch

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::{BotError, CommandError, ModuleError};
use crate::domain::entities::{Command, Content, Message};
use crate::modules::{ExtensionLoader, ModuleManager};

/// Service for managing and executing commands
pub struct CommandService {
    commands: HashMap<String, Command>,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            commands: HashMap::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        if self.commands.contains_key(&command.name) {
            return Err(CommandError::AlreadyRegistered(command.name));
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Turn raw chat input into a message, splitting off the command prefix
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        tenant_id: Option<u64>,
    ) -> Message {
        let text = text.into();
        let mut message = if let Some(rest) = text.strip_prefix(&self.prefix) {
            let mut parts = rest.split_whitespace();
            match parts.next() {
                Some(name) => Message::from_command(
                    chat_id,
                    name,
                    parts.map(str::to_string).collect(),
                ),
                None => Message::new(chat_id, Content::Empty),
            }
        } else {
            Message::from_text(chat_id, text)
        };
        message.tenant_id = tenant_id;
        message
    }

    /// Dispatch a parsed message to its command handler.
    ///
    /// Commands owned by a module are refused unless the message carries a
    /// tenant id and [`ModuleManager::is_enabled_for_tenant`] approves that
    /// module for the tenant. Non-command messages return `Ok(None)`.
    pub async fn dispatch(
        &self,
        manager: &ModuleManager,
        message: &Message,
    ) -> Result<Option<String>, BotError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if let Some(module) = &command.module {
            let Some(tenant_id) = message.tenant_id else {
                return Err(BotError::PermissionDenied(format!(
                    "Module '{}' can only be used inside a tenant",
                    module
                )));
            };
            if !manager.is_enabled_for_tenant(module, tenant_id).await {
                return Err(BotError::PermissionDenied(format!(
                    "Module '{}' is not enabled for this tenant",
                    module
                )));
            }
        }

        match &command.handler {
            Some(handler) => Ok(Some(handler(message.clone())?)),
            None => Ok(Some(format!("Command {} not implemented", command.name))),
        }
    }

    pub fn register_defaults(&mut self) -> Result<(), CommandError> {
        let prefix = self.prefix.clone();
        self.register(
            Command::new("help")
                .with_description("Show help message")
                .with_usage("help [command]")
                .with_handler(move |_| {
                    Ok(format!(
                        "Available commands:\n{p}help - Show this message\n{p}version - Show version",
                        p = prefix
                    ))
                }),
        )?;

        self.register(
            Command::new("version")
                .with_description("Show bot version")
                .with_handler(|_| Ok(format!("rampage-bot v{}", env!("CARGO_PKG_VERSION")))),
        )?;

        Ok(())
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.commands.get(name) {
                let mut help = format!(
                    "{}{} - {}",
                    self.prefix,
                    cmd.name,
                    cmd.description.as_deref().unwrap_or("No description")
                );
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}{}", self.prefix, usage));
                }
                help
            } else {
                format!("Unknown command: {}", name)
            }
        } else {
            let mut lines = vec!["Available commands:".to_string()];
            for name in self.names() {
                lines.push(format!("{}{}", self.prefix, name));
            }
            lines.join("\n")
        }
    }
}

/// Extension loader backed by the command service.
///
/// Holds the commands each module ships, keyed by module name; activation of
/// a module registers its commands, and a module with no entry is a no-op.
pub struct CommandExtensions {
    service: Arc<RwLock<CommandService>>,
    extensions: HashMap<String, Vec<Command>>,
}

impl CommandExtensions {
    pub fn new(service: Arc<RwLock<CommandService>>) -> Self {
        Self {
            service,
            extensions: HashMap::new(),
        }
    }

    /// Declare the commands a module contributes when activated
    pub fn provide(mut self, module: impl Into<String>, commands: Vec<Command>) -> Self {
        let module = module.into();
        let commands = commands
            .into_iter()
            .map(|c| c.with_module(module.clone()))
            .collect();
        self.extensions.insert(module, commands);
        self
    }
}

#[async_trait]
impl ExtensionLoader for CommandExtensions {
    async fn register_extensions(&self, module_name: &str) -> Result<(), ModuleError> {
        let Some(commands) = self.extensions.get(module_name) else {
            // Module ships no commands
            return Ok(());
        };

        let mut service = self.service.write().await;
        for command in commands {
            service
                .register(command.clone())
                .map_err(|e| ModuleError::Extension {
                    module: module_name.to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_prefixed_commands() {
        let service = CommandService::new("?");
        let message = service.parse("chat", "?example one two", Some(7));

        assert_eq!(message.tenant_id, Some(7));
        match message.content {
            Content::Command { name, args } => {
                assert_eq!(name, "example");
                assert_eq!(args, vec!["one".to_string(), "two".to_string()]);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn parse_leaves_plain_text_alone() {
        let service = CommandService::new("?");
        let message = service.parse("chat", "hello there", None);
        assert_eq!(message.content.text(), Some("hello there"));
    }

    #[test]
    fn duplicate_command_registration_fails() {
        let mut service = CommandService::new("?");
        service.register(Command::new("ping")).unwrap();
        let err = service.register(Command::new("ping")).unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(name) if name == "ping"));
    }

    mod dispatch {
        use super::*;
        use std::collections::{HashMap, HashSet};
        use crate::modules::testing::{noop_module, NullBot};
        use crate::modules::{ModuleRegistry, NoExtensions};

        async fn stats_manager(tenants: HashMap<u64, HashSet<String>>) -> ModuleManager {
            let mut registry = ModuleRegistry::new();
            registry.register(noop_module("stats")).unwrap();
            let manager = ModuleManager::new(
                registry,
                Arc::new(NullBot),
                Arc::new(NoExtensions),
                Vec::new(),
                tenants,
            );
            manager
                .enable_modules(&["stats".to_string()])
                .await
                .unwrap();
            manager
        }

        fn gated_service() -> CommandService {
            let mut service = CommandService::new("?");
            service
                .register(
                    Command::new("top")
                        .with_module("stats")
                        .with_handler(|_| Ok("scoreboard".to_string())),
                )
                .unwrap();
            service
        }

        #[tokio::test]
        async fn module_command_runs_for_an_enabled_tenant() {
            let tenants = HashMap::from([(7, HashSet::from(["stats".to_string()]))]);
            let manager = stats_manager(tenants).await;
            let service = gated_service();

            let message = service.parse("chat", "?top", Some(7));
            let response = service.dispatch(&manager, &message).await.unwrap();
            assert_eq!(response.as_deref(), Some("scoreboard"));
        }

        #[tokio::test]
        async fn module_command_is_refused_for_a_disabled_tenant() {
            let manager = stats_manager(HashMap::new()).await;
            let service = gated_service();

            let message = service.parse("chat", "?top", Some(7));
            let err = service.dispatch(&manager, &message).await.unwrap_err();
            assert!(matches!(err, BotError::PermissionDenied(_)));
        }

        #[tokio::test]
        async fn module_command_is_refused_without_a_tenant() {
            let tenants = HashMap::from([(7, HashSet::from(["stats".to_string()]))]);
            let manager = stats_manager(tenants).await;
            let service = gated_service();

            let message = service.parse("chat", "?top", None);
            let err = service.dispatch(&manager, &message).await.unwrap_err();
            assert!(matches!(err, BotError::PermissionDenied(_)));
        }

        #[tokio::test]
        async fn unowned_commands_bypass_the_tenant_gate() {
            let manager = stats_manager(HashMap::new()).await;
            let mut service = gated_service();
            service.register_defaults().unwrap();

            let message = service.parse("chat", "?version", None);
            let response = service.dispatch(&manager, &message).await.unwrap();
            assert!(response.is_some_and(|r| r.starts_with("rampage-bot v")));
        }
    }
}
