//! Squad entity and settings.

pub mod entities;
pub mod settings;
