//! Application layer errors

use thiserror::Error;

/// Module lifecycle errors
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("unknown module(s): {}", .0.join(", "))]
    UnknownModule(Vec<String>),

    #[error("module '{0}' is already registered")]
    DuplicateModule(String),

    #[error("dependency cycle detected: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("module '{module}' requires module '{requires}', but it is not enabled")]
    UnsatisfiedDependency { module: String, requires: String },

    #[error("module '{0}' is not active")]
    NotActive(String),

    #[error("module '{module}' is still required by active module '{dependent}'")]
    RequiredByActive { module: String, dependent: String },

    #[error("setup failed: {0}")]
    Setup(String),

    #[error("teardown failed: {0}")]
    Teardown(String),

    #[error("extension registration failed for module '{module}': {reason}")]
    Extension { module: String, reason: String },
}

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Module error: {0}")]
    Module(#[from] ModuleError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied")]
    PermissionDenied,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
