//! Configuration loading: raw TOML structures and the figment-based
//! multi-source loader.

pub mod file_config;
pub mod loader;

pub use file_config::{ConfigValidationError, FileConfig};
pub use loader::ConfigLoader;
