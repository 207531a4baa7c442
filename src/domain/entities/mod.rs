//! Domain entities

pub mod command;
pub mod message;

pub use command::{Command, CommandHandler};
pub use message::{Content, Message};
