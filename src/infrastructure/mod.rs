//! Infrastructure layer - config and platform adapters

pub mod adapters;
pub mod config;
