//! Domain layer - Core entities and trait abstractions

pub mod entities;
pub mod traits;
