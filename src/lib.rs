//! rampage-bot - a chat-bot host built from named modules with declared
//! dependencies. The `modules` layer (registry, dependency graph, lifecycle
//! manager) is the core; everything else is the host around it.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod modules;
