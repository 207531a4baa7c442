//! Module system for rampage-bot
//!
//! Modules are independently activatable feature units with a unique name
//! and declared dependencies. The registry knows which modules exist, the
//! graph decides whether a batch can be activated, and the manager owns the
//! active instances.

pub mod builtin;
pub mod descriptor;
pub mod extensions;
pub mod graph;
pub mod manager;
pub mod registry;

pub use descriptor::{Module, ModuleDescriptor};
pub use extensions::{ExtensionLoader, NoExtensions};
pub use manager::ModuleManager;
pub use registry::ModuleRegistry;
